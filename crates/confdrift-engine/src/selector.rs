//! Rule selection: environment scoping and first-match resolution.

use confdrift_core::errors::DetectionError;

use crate::matcher::KeyPattern;
use crate::types::Rule;

/// A rule paired with its compiled key pattern.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: Rule,
    pattern: KeyPattern,
}

impl CompiledRule {
    pub fn compile(rule: Rule) -> Result<Self, DetectionError> {
        let pattern = KeyPattern::compile(&rule.key)?;
        Ok(Self { rule, pattern })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.pattern.matches(key)
    }
}

/// An ordered, precompiled rule list. Order is significant: the first rule
/// whose pattern matches a key governs that key.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile every rule, failing on the first invalid pattern.
    pub fn compile<I>(rules: I) -> Result<Self, DetectionError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rules in effect for `environment`, in declaration order.
    pub fn applicable(&self, environment: &str) -> Vec<&CompiledRule> {
        applicable_rules(&self.rules, environment)
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Keep rules whose environment is `"*"` or exactly `environment`.
pub fn applicable_rules<'a>(rules: &'a [CompiledRule], environment: &str) -> Vec<&'a CompiledRule> {
    rules
        .iter()
        .filter(|c| c.rule.applies_to(environment))
        .collect()
}

/// First rule in list order whose pattern matches `key`.
pub fn find_rule<'a>(key: &str, rules: &[&'a CompiledRule]) -> Option<&'a CompiledRule> {
    rules.iter().copied().find(|c| c.matches(key))
}
