//! v002: seed the default production rule set into an empty rule table.

pub const MIGRATION_SQL: &str = r#"
INSERT INTO config_rules (id, position, config_key, required, allowed_in_prod, min_value, max_value, change_policy, environment)
SELECT * FROM (
    SELECT 'rule-1', 1, 'server.port', 0, 1, NULL, NULL, 'RUNTIME_ALLOWED', '*'
    UNION ALL SELECT 'rule-2', 2, 'spring.profiles.active', 1, 1, NULL, NULL, 'CI_ONLY', '*'
    UNION ALL SELECT 'rule-3', 3, 'debug', 0, 0, NULL, NULL, 'CI_ONLY', 'prod'
    UNION ALL SELECT 'rule-4', 4, 'logging.level.*', 0, 1, NULL, NULL, 'RUNTIME_ALLOWED', '*'
    UNION ALL SELECT 'rule-5', 5, 'payment.timeout', 0, 1, 1000.0, 30000.0, 'CI_ONLY', 'prod'
    UNION ALL SELECT 'rule-6', 6, 'database.*', 1, 1, NULL, NULL, 'CI_ONLY', '*'
)
WHERE NOT EXISTS (SELECT 1 FROM config_rules);
"#;
