use crate::core_ftpcommand::reply::{Flow, Reply};
use crate::core_network::codec::CommandLine;
use crate::core_network::connection::{Connection, Listener};
use crate::error::{FtpError, FtpResult};
use crate::session::Session;
use log::{debug, info, warn};
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::sync::OnceLock;
use std::time::Duration;

/// Formats the `(h0,h1,h2,h3,p0,p1)` tuple of a PASV reply.
pub fn encode_pasv_address(ip: Ipv4Addr, port: u16) -> String {
    let [h0, h1, h2, h3] = ip.octets();
    format!("({},{},{},{},{},{})", h0, h1, h2, h3, port >> 8, port & 0xFF)
}

/// Extracts the data address from the text of a `227` reply.
pub fn parse_pasv_reply(text: &str) -> FtpResult<SocketAddrV4> {
    static PASV_TUPLE: OnceLock<Regex> = OnceLock::new();
    let re = PASV_TUPLE.get_or_init(|| {
        Regex::new(r"\((\d+),(\d+),(\d+),(\d+),(\d+),(\d+)\)").expect("valid PASV regex")
    });
    let bad = || FtpError::Protocol(format!("bad response for PASV: {}", text));
    let caps = re.captures(text).ok_or_else(bad)?;
    let mut values = [0u8; 6];
    for (i, value) in values.iter_mut().enumerate() {
        *value = caps[i + 1].parse().map_err(|_| bad())?;
    }
    let ip = Ipv4Addr::new(values[0], values[1], values[2], values[3]);
    let port = u16::from(values[4]) << 8 | u16::from(values[5]);
    Ok(SocketAddrV4::new(ip, port))
}

fn advertised_ipv4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Handles the PASV command.
///
/// Binds a fresh listener on an ephemeral port of the control connection's
/// local address and stores it in the session, replacing any listener left
/// from an earlier PASV.
pub async fn handle_pasv_command(session: &mut Session, _cmd: &CommandLine) -> FtpResult<Flow> {
    let local = session.ctrl.connection().local_addr()?;
    let advertised = match session.config.server.pasv_address {
        Some(ip) => Some(ip),
        None => advertised_ipv4(local.ip()),
    };
    let Some(advertised) = advertised else {
        warn!("[{}] PASV requested over non-IPv4 control connection", session.peer());
        return Ok(Flow::Continue(Reply::new(425, "passive mode requires IPv4")));
    };

    let mut listener = Listener::bind((local.ip(), 0)).await?;
    listener.enable_timeout(session.config.server.io_timeout());
    let port = listener.local_port()?;
    if session.passive_listener.replace(listener).is_some() {
        debug!("[{}] Replaced unused passive listener", session.peer());
    }
    debug!(
        "[{}] Passive listener on {}:{}",
        session.peer(),
        local.ip(),
        port
    );

    Ok(Flow::Continue(Reply::new(
        227,
        format!(
            "Entering Passive Mode {}.",
            encode_pasv_address(advertised, port)
        ),
    )))
}

/// Accepts exactly one data connection on a listener taken from the session
/// and arms its deadline. The listener is consumed.
pub async fn accept_data_connection(
    listener: Listener,
    deadline: Duration,
    peer: &str,
) -> FtpResult<Connection> {
    debug!("[{}] Waiting for data connection", peer);
    let mut conn = listener.accept().await?;
    conn.enable_timeout(deadline);
    info!("[{}] Data connection from {}", peer, conn.peer());
    Ok(conn)
}
