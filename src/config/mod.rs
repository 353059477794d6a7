/// Library tunables. Defaults match the collaborating store's practical
/// limits; embedders override with struct-update syntax.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Unfiltered page size fetched by `recent` before in-memory
    /// filtering. The store has no composite index, so nothing past this
    /// page is visible to callers.
    pub fetch_page: usize,
    /// How many recent sessions PR detection scans for the prior best.
    pub pr_lookback: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            fetch_page: 50,
            pr_lookback: 50,
        }
    }
}
