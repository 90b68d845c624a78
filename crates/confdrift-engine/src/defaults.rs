//! Built-in rule set for a typical production service.

use crate::types::Rule;

/// Default production rules, in precedence order.
pub fn default_production_rules() -> Vec<Rule> {
    vec![
        Rule::new("server.port"),
        Rule::new("spring.profiles.active").require().ci_only(),
        Rule::new("debug")
            .deny_in_prod()
            .ci_only()
            .in_environment("prod"),
        Rule::new("logging.level.*"),
        Rule::new("payment.timeout")
            .min(1000.0)
            .max(30000.0)
            .ci_only()
            .in_environment("prod"),
        Rule::new("database.*").require().ci_only(),
    ]
}
