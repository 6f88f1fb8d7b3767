/// Subsystem tags attached to every log line

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Cache,
    Rpc,
    Scanner,
    Processor,
    Metadata,
    Score,
    Wallet,
}

impl LogTag {
    /// All tags, used for `--debug-all` and help output
    pub const ALL: [LogTag; 9] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Cache,
        LogTag::Rpc,
        LogTag::Scanner,
        LogTag::Processor,
        LogTag::Metadata,
        LogTag::Score,
        LogTag::Wallet,
    ];

    /// Uppercase label shown in the console and the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Cache => "CACHE",
            LogTag::Rpc => "RPC",
            LogTag::Scanner => "SCANNER",
            LogTag::Processor => "PROCESSOR",
            LogTag::Metadata => "METADATA",
            LogTag::Score => "SCORE",
            LogTag::Wallet => "WALLET",
        }
        .to_string()
    }

    /// Key used by `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        self.to_plain_string().to_lowercase()
    }
}
