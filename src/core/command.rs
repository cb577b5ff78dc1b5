//! Command parser for the : command system

/// What `copy` puts on the clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Address,
    Mnemonic,
    PrivateKey,
    TxLink,
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Account
    New,
    Recover(Option<String>),
    Index(u32),

    // Transfer form
    Send { amount: String, to: String },
    To(String),
    Amount(String),

    // Queries
    Refresh,

    // Misc
    Copy(CopyTarget),
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        // Account
        "new" | "create" | "generate" => Command::New,
        "recover" | "import" => Command::Recover(args),
        "index" | "idx" => match args.and_then(|s| s.parse().ok()) {
            Some(index) => Command::Index(index),
            None => Command::Unknown(input.to_string()),
        },

        // Transfer form
        "send" => {
            let words: Vec<&str> = args
                .as_deref()
                .map(|s| s.split_whitespace().collect())
                .unwrap_or_default();
            match words.as_slice() {
                [amount, to] => Command::Send {
                    amount: amount.to_string(),
                    to: to.to_string(),
                },
                _ => Command::Unknown(input.to_string()),
            }
        }
        "to" | "dest" => match args {
            Some(address) => Command::To(address),
            None => Command::Unknown(input.to_string()),
        },
        "amount" | "amt" => match args {
            Some(value) => Command::Amount(value),
            None => Command::Unknown(input.to_string()),
        },

        "refresh" | "r" => Command::Refresh,

        "copy" | "cp" => match args.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("address") | Some("addr") => Command::Copy(CopyTarget::Address),
            Some("mnemonic") | Some("seed") => Command::Copy(CopyTarget::Mnemonic),
            Some("key") | Some("privkey") => Command::Copy(CopyTarget::PrivateKey),
            Some("tx") | Some("link") => Command::Copy(CopyTarget::TxLink),
            Some(_) => Command::Unknown(input.to_string()),
        },

        "help" | "h" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}
