use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_ftpcommand::{
    allo, cdup, cwd, dele, feat, list, mkd, noop, pass, pwd, quit, retr, rmd, size, stor, syst,
    type_, user,
};
use crate::core_network::codec::CommandLine;
use crate::core_network::pasv;
use crate::error::FtpResult;
use crate::session::Session;
use log::warn;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = FtpResult<Flow>> + Send + 'a>>;

pub type CommandHandler = for<'a> fn(&'a mut Session, &'a CommandLine) -> HandlerFuture<'a>;

pub type HandlerTable = HashMap<FtpCommand, CommandHandler>;

/// Boxes an `async fn(&mut Session, &CommandLine) -> FtpResult<Flow>` into a
/// table entry.
macro_rules! handler {
    ($handle:path) => {{
        fn boxed<'a>(session: &'a mut Session, cmd: &'a CommandLine) -> HandlerFuture<'a> {
            Box::pin($handle(session, cmd))
        }
        boxed as CommandHandler
    }};
}

/// Builds the verb table once; every session shares it.
pub fn initialize_command_handlers() -> HandlerTable {
    let mut handlers: HandlerTable = HashMap::new();

    handlers.insert(FtpCommand::Feat, handler!(feat::handle_feat_command));
    handlers.insert(FtpCommand::Pwd, handler!(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::Xpwd, handler!(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::Pasv, handler!(pasv::handle_pasv_command));
    handlers.insert(FtpCommand::Quit, handler!(quit::handle_quit_command));
    handlers.insert(FtpCommand::User, handler!(user::handle_user_command));
    handlers.insert(FtpCommand::Pass, handler!(pass::handle_pass_command));
    handlers.insert(FtpCommand::Syst, handler!(syst::handle_syst_command));
    handlers.insert(FtpCommand::Type, handler!(type_::handle_type_command));
    handlers.insert(FtpCommand::List, handler!(list::handle_list_command));
    handlers.insert(FtpCommand::Nlst, handler!(list::handle_nlst_command));
    handlers.insert(FtpCommand::Cwd, handler!(cwd::handle_cwd_command));
    handlers.insert(FtpCommand::Cdup, handler!(cdup::handle_cdup_command));
    handlers.insert(FtpCommand::Size, handler!(size::handle_size_command));
    handlers.insert(FtpCommand::Retr, handler!(retr::handle_retr_command));
    handlers.insert(FtpCommand::Allo, handler!(allo::handle_allo_command));
    handlers.insert(FtpCommand::Stor, handler!(stor::handle_stor_command));
    handlers.insert(FtpCommand::Dele, handler!(dele::handle_dele_command));
    handlers.insert(FtpCommand::Rmd, handler!(rmd::handle_rmd_command));
    handlers.insert(FtpCommand::Mkd, handler!(mkd::handle_mkd_command));
    handlers.insert(FtpCommand::Noop, handler!(noop::handle_noop_command));

    handlers
}

/// Runs the handler for `cmd`. Unknown verbs get a 502 and the session
/// carries on.
pub async fn dispatch(
    session: &mut Session,
    handlers: &HandlerTable,
    cmd: &CommandLine,
) -> FtpResult<Flow> {
    match FtpCommand::parse(&cmd.verb).and_then(|c| handlers.get(&c)) {
        Some(handler) => handler(session, cmd).await,
        None => {
            warn!("[{}] Unknown command: {}", session.peer(), cmd.verb);
            Ok(Flow::Continue(Reply::new(
                502,
                format!("command {} unimplemented", cmd.verb),
            )))
        }
    }
}
