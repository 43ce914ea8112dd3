#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    Feat,
    Pwd,
    Xpwd,
    Pasv,
    Quit,
    User,
    Pass,
    Syst,
    Type,
    List,
    Nlst,
    Cwd,
    Cdup,
    Size,
    Retr,
    Allo,
    Stor,
    Dele,
    Rmd,
    Mkd,
    Noop,
}

impl FtpCommand {
    /// Looks up an already uppercased verb.
    pub fn parse(verb: &str) -> Option<FtpCommand> {
        match verb {
            "FEAT" => Some(FtpCommand::Feat),
            "PWD" => Some(FtpCommand::Pwd),
            "XPWD" => Some(FtpCommand::Xpwd),
            "PASV" => Some(FtpCommand::Pasv),
            "QUIT" => Some(FtpCommand::Quit),
            "USER" => Some(FtpCommand::User),
            "PASS" => Some(FtpCommand::Pass),
            "SYST" => Some(FtpCommand::Syst),
            "TYPE" => Some(FtpCommand::Type),
            "LIST" => Some(FtpCommand::List),
            "NLST" => Some(FtpCommand::Nlst),
            "CWD" => Some(FtpCommand::Cwd),
            "CDUP" => Some(FtpCommand::Cdup),
            "SIZE" => Some(FtpCommand::Size),
            "RETR" => Some(FtpCommand::Retr),
            "ALLO" => Some(FtpCommand::Allo),
            "STOR" => Some(FtpCommand::Stor),
            "DELE" => Some(FtpCommand::Dele),
            "RMD" => Some(FtpCommand::Rmd),
            "MKD" => Some(FtpCommand::Mkd),
            "NOOP" => Some(FtpCommand::Noop),
            _ => None,
        }
    }
}
