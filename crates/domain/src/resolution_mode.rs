/// Target server value that asks the relay to walk the hierarchy itself.
pub const ITERATIVE_SENTINEL: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Walk the DNS hierarchy from the root.
    Iterative,
    /// Forward the question to `server` with recursion desired.
    Recursive { server: String },
}

impl ResolutionMode {
    pub fn select(target_server: &str) -> Self {
        let target = target_server.trim();
        if target == ITERATIVE_SENTINEL {
            Self::Iterative
        } else {
            Self::Recursive {
                server: target.to_string(),
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iterative => "iterative",
            Self::Recursive { .. } => "recursive",
        }
    }
}
