// Here's the list of the FTP commands implemented
pub mod allo;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod list;
pub mod mkd;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// Dispatch plumbing
pub mod ftpcommand;
pub mod handlers;
pub mod reply;

// The utils and common functions are here
pub mod utils;
