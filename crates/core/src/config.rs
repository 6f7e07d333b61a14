/// What a writer does with transient keys found in a raw metadata map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransientPolicy {
    #[default]
    Strip,
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct WriteConfig {
    pub transient_policy: TransientPolicy,
}

impl WriteConfig {
    pub fn strict() -> Self {
        Self {
            transient_policy: TransientPolicy::Reject,
        }
    }
}
