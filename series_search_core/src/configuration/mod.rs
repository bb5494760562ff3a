use log::LevelFilter;

#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub concurrent_threads: Option<usize>,
    pub fail_fast: Option<bool>,
    pub log_level: Option<LevelFilter>,
}
