use super::parse_bool_env;

#[derive(Debug, Clone, Copy)]
pub struct ForumConfig {
    /// Insert the stock categories at startup when they are missing.
    pub seed_default_categories: bool,
}

impl ForumConfig {
    pub fn from_env() -> Self {
        Self {
            seed_default_categories: parse_bool_env("SEED_DEFAULT_CATEGORIES", true),
        }
    }
}
