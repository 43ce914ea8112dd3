use sandftp::client::FtpClient;
use sandftp::core_network::codec::{CommandLine, LineCodec};
use sandftp::core_network::connection::Connection;
use sandftp::core_network::pasv::parse_pasv_reply;
use sandftp::core_transfer::pump::receive_binary;
use sandftp::server::Server;
use sandftp::{Config, FtpError};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use tempfile::TempDir;

struct TestServer {
    addr: SocketAddr,
    root: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_timeout(10).await
    }

    async fn start_with_timeout(io_timeout_secs: u64) -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.listen_address = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.listen_port = 0;
        config.server.root_dir = root.path().to_path_buf();
        config.server.io_timeout_secs = io_timeout_secs;

        let server = Server::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.serve_forever());
        Self { addr, root }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    async fn client(&self) -> FtpClient {
        FtpClient::connect("127.0.0.1", self.addr.port()).await.unwrap()
    }

    /// Control connection without the client's login sequence.
    async fn raw(&self) -> LineCodec {
        let conn = Connection::connect("127.0.0.1", self.addr.port())
            .await
            .unwrap();
        let mut ctrl = LineCodec::new(conn);
        let greeting = ctrl.receive_line().await.unwrap();
        assert_eq!(greeting.verb, "220");
        ctrl
    }
}

async fn exchange(ctrl: &mut LineCodec, verb: &str, arg: &str) -> CommandLine {
    ctrl.send_line(verb, arg).await.unwrap();
    ctrl.receive_line().await.unwrap()
}

async fn open_data(ctrl: &mut LineCodec) -> Connection {
    let pasv = exchange(ctrl, "PASV", "").await;
    assert_eq!(pasv.verb, "227");
    let addr = parse_pasv_reply(&pasv.argument).unwrap();
    Connection::connect(&addr.ip().to_string(), addr.port())
        .await
        .unwrap()
}

async fn assert_still_serving(ctrl: &mut LineCodec) {
    let pwd = exchange(ctrl, "PWD", "").await;
    assert_eq!(pwd.verb, "257");
}

fn reply_code(err: FtpError) -> (String, String) {
    match err {
        FtpError::UnexpectedReply { code, message } => (code, message),
        other => panic!("expected an error reply, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cwd_cannot_leave_root() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let (code, _) = reply_code(client.chdir("/etc").await.unwrap_err());
    assert_eq!(code, "550");
    let (code, _) = reply_code(client.chdir("../../..").await.unwrap_err());
    assert_eq!(code, "550");
    assert_eq!(client.pwd().await.unwrap(), "/");

    let mut raw = server.raw().await;
    let reply = exchange(&mut raw, "CDUP", "").await;
    assert_eq!(reply.verb, "550");
}

#[tokio::test]
async fn test_cwd_and_pwd_inside_root() {
    let server = TestServer::start().await;
    std::fs::create_dir_all(server.path().join("pub/incoming")).unwrap();
    let mut client = server.client().await;

    client.chdir("pub").await.unwrap();
    client.chdir("incoming").await.unwrap();
    assert_eq!(client.pwd().await.unwrap(), "/pub/incoming");
    client.chdir("..").await.unwrap();
    assert_eq!(client.pwd().await.unwrap(), "/pub");
    client.chdir("/").await.unwrap();
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn test_list_streams_directory_over_passive_connection() {
    let server = TestServer::start().await;
    std::fs::write(server.path().join("hello.txt"), b"hi").unwrap();
    std::fs::write(server.path().join(".hidden"), b"").unwrap();
    let mut client = server.client().await;

    let mut listing = Vec::new();
    client.list(&mut listing).await.unwrap();
    let text = String::from_utf8(listing).unwrap();
    assert!(text.contains("hello.txt"), "{}", text);
    assert!(text.contains(".hidden"), "{}", text);
    assert!(text.ends_with("\r\n"));
    assert!(!text.replace("\r\n", "").contains('\n'));
}

#[tokio::test]
async fn test_nlst_skips_hidden_entries() {
    let server = TestServer::start().await;
    std::fs::write(server.path().join("visible"), b"").unwrap();
    std::fs::write(server.path().join(".hidden"), b"").unwrap();
    let mut ctrl = server.raw().await;

    let pasv = exchange(&mut ctrl, "PASV", "").await;
    assert_eq!(pasv.verb, "227");
    let addr = parse_pasv_reply(&pasv.argument).unwrap();
    let mut data = Connection::connect(&addr.ip().to_string(), addr.port())
        .await
        .unwrap();
    assert_eq!(exchange(&mut ctrl, "NLST", "").await.verb, "150");
    let mut listing = Vec::new();
    receive_binary(&mut data, &mut listing, 1024).await.unwrap();
    assert_eq!(ctrl.receive_line().await.unwrap().verb, "226");

    let text = String::from_utf8(listing).unwrap();
    assert!(text.contains("visible"));
    assert!(!text.contains(".hidden"));
}

#[tokio::test]
async fn test_stor_then_size() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let data = vec![0x5au8; 5000];
    let mut source: &[u8] = &data;
    assert_eq!(client.put("blob.bin", &mut source).await.unwrap(), 5000);
    assert_eq!(client.size("blob.bin").await.unwrap(), 5000);
    assert_eq!(std::fs::read(server.path().join("blob.bin")).unwrap(), data);
}

#[tokio::test]
async fn test_round_trip_preserves_bytes() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let payloads: [&[u8]; 3] = [b"", b"line one\r\nline two\n\r", &[0, 255, 13, 10, 13]];
    for (i, payload) in payloads.into_iter().enumerate() {
        let name = format!("file{}", i);
        let mut source: &[u8] = payload;
        client.put(&name, &mut source).await.unwrap();

        let mut fetched = Vec::new();
        client.get(&name, &mut fetched).await.unwrap();
        assert_eq!(fetched, payload);
    }
}

#[tokio::test]
async fn test_retr_missing_file_fails_and_session_continues() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut sink = Vec::new();
    let (code, message) = reply_code(client.get("nope", &mut sink).await.unwrap_err());
    assert_eq!(code, "550");
    assert_eq!(message, "failed to open");
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn test_dele_missing_file() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let (code, message) = reply_code(client.remove("ghost").await.unwrap_err());
    assert_eq!(code, "550");
    assert_eq!(message, "failed to delete");
}

#[tokio::test]
async fn test_dele_and_rmd_remove_entries() {
    let server = TestServer::start().await;
    std::fs::write(server.path().join("old.txt"), b"x").unwrap();
    std::fs::create_dir(server.path().join("empty")).unwrap();
    let mut client = server.client().await;

    client.remove("old.txt").await.unwrap();
    assert!(!server.path().join("old.txt").exists());

    let mut raw = server.raw().await;
    let reply = exchange(&mut raw, "RMD", "empty/").await;
    assert_eq!(reply.verb, "250");
    assert!(!server.path().join("empty").exists());
}

#[tokio::test]
async fn test_mkd_requires_existing_parent() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let (code, message) = reply_code(client.mkdir("sub/dir").await.unwrap_err());
    assert_eq!(code, "550");
    assert_eq!(message, "parent directory does not exist");

    client.mkdir("sub").await.unwrap();
    client.mkdir("sub/dir").await.unwrap();
    assert!(server.path().join("sub/dir").is_dir());

    let mut raw = server.raw().await;
    let reply = exchange(&mut raw, "MKD", "sub").await;
    assert_eq!(reply.verb, "550");
    assert!(reply.argument.starts_with("failed to mkdir"));
}

#[tokio::test]
async fn test_passive_listener_is_single_use() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    let reply = exchange(&mut ctrl, "RETR", "anything").await;
    assert_eq!(reply.verb, "425");

    let pasv = exchange(&mut ctrl, "PASV", "").await;
    let addr = parse_pasv_reply(&pasv.argument).unwrap();
    let mut data = Connection::connect(&addr.ip().to_string(), addr.port())
        .await
        .unwrap();
    assert_eq!(exchange(&mut ctrl, "LIST", "").await.verb, "150");
    let mut listing = Vec::new();
    receive_binary(&mut data, &mut listing, 1024).await.unwrap();
    assert_eq!(ctrl.receive_line().await.unwrap().verb, "226");

    let reply = exchange(&mut ctrl, "LIST", "").await;
    assert_eq!(reply.verb, "425");
    assert_eq!(reply.argument, "use passive mode first");
}

#[tokio::test]
async fn test_failed_data_command_still_consumes_listener() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    assert_eq!(exchange(&mut ctrl, "PASV", "").await.verb, "227");
    assert_eq!(exchange(&mut ctrl, "RETR", "missing").await.verb, "550");
    assert_eq!(exchange(&mut ctrl, "RETR", "missing").await.verb, "425");
}

#[tokio::test]
async fn test_informational_commands_are_idempotent() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    for _ in 0..2 {
        let pwd = exchange(&mut ctrl, "PWD", "").await;
        assert_eq!((pwd.verb.as_str(), pwd.argument.as_str()), ("257", "\"/\""));
        let syst = exchange(&mut ctrl, "SYST", "").await;
        assert_eq!(
            (syst.verb.as_str(), syst.argument.as_str()),
            ("215", "UNIX Type: L8")
        );
    }
    assert_eq!(exchange(&mut ctrl, "xpwd", "").await.verb, "257");
}

#[tokio::test]
async fn test_unknown_verb_keeps_session_alive() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    let reply = exchange(&mut ctrl, "PORT", "127,0,0,1,4,1").await;
    assert_eq!(reply.verb, "502");
    assert_eq!(reply.argument, "command PORT unimplemented");

    assert_eq!(exchange(&mut ctrl, "USER", "anonymous").await.verb, "230");
    assert_eq!(exchange(&mut ctrl, "PASS", "secret").await.verb, "230");
    assert_eq!(exchange(&mut ctrl, "TYPE", "A").await.verb, "200");
    assert_eq!(exchange(&mut ctrl, "ALLO", "100").await.verb, "202");
    assert_eq!(exchange(&mut ctrl, "FEAT", "").await.verb, "211");
    assert_eq!(exchange(&mut ctrl, "NOOP", "").await.verb, "200");
}

#[tokio::test]
async fn test_quit_ends_session() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    let reply = exchange(&mut ctrl, "QUIT", "").await;
    assert_eq!(reply.verb, "221");
    assert!(matches!(
        ctrl.receive_line().await,
        Err(FtpError::ConnectionClosed)
    ));

    server.client().await.quit().await.unwrap();
}

#[tokio::test]
async fn test_sessions_have_independent_working_dirs() {
    let server = TestServer::start().await;
    std::fs::create_dir(server.path().join("a")).unwrap();
    let mut first = server.client().await;
    let mut second = server.client().await;

    first.chdir("a").await.unwrap();
    assert_eq!(first.pwd().await.unwrap(), "/a");
    assert_eq!(second.pwd().await.unwrap(), "/");
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_refused() {
    let server = TestServer::start().await;
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret"), b"top secret").unwrap();
    std::os::unix::fs::symlink(outside.path(), server.path().join("escape")).unwrap();
    let mut client = server.client().await;

    let (code, _) = reply_code(client.chdir("escape").await.unwrap_err());
    assert_eq!(code, "550");
    let mut sink = Vec::new();
    let (code, _) = reply_code(client.get("escape/secret", &mut sink).await.unwrap_err());
    assert_eq!(code, "550");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_stor_keeps_file_when_data_connection_never_comes() {
    let server = TestServer::start_with_timeout(1).await;
    std::fs::write(server.path().join("keep.txt"), b"precious data").unwrap();
    let mut ctrl = server.raw().await;

    assert_eq!(exchange(&mut ctrl, "PASV", "").await.verb, "227");
    assert_eq!(exchange(&mut ctrl, "STOR", "keep.txt").await.verb, "150");
    let reply = ctrl.receive_line().await.unwrap();
    assert_eq!(reply.verb, "425");
    assert_eq!(reply.argument, "can't open data connection");

    assert_eq!(
        std::fs::read(server.path().join("keep.txt")).unwrap(),
        b"precious data"
    );
    assert_still_serving(&mut ctrl).await;
}

#[tokio::test]
async fn test_retr_without_data_connection_times_out() {
    let server = TestServer::start_with_timeout(1).await;
    std::fs::write(server.path().join("file.bin"), b"abc").unwrap();
    let mut ctrl = server.raw().await;

    assert_eq!(exchange(&mut ctrl, "PASV", "").await.verb, "227");
    assert_eq!(exchange(&mut ctrl, "RETR", "file.bin").await.verb, "150");
    let reply = ctrl.receive_line().await.unwrap();
    assert_eq!(reply.verb, "425");
    assert_eq!(reply.argument, "can't open data connection");
    assert_still_serving(&mut ctrl).await;
}

#[tokio::test]
async fn test_stalled_upload_is_aborted() {
    let server = TestServer::start_with_timeout(1).await;
    let mut ctrl = server.raw().await;

    let mut data = open_data(&mut ctrl).await;
    assert_eq!(exchange(&mut ctrl, "STOR", "part.bin").await.verb, "150");
    data.send(b"partial").await.unwrap();

    let reply = ctrl.receive_line().await.unwrap();
    assert_eq!(reply.verb, "426");
    assert_still_serving(&mut ctrl).await;
    drop(data);
}

#[tokio::test]
async fn test_stor_refuses_unwritable_targets() {
    let server = TestServer::start().await;
    std::fs::create_dir(server.path().join("dir")).unwrap();
    let mut client = server.client().await;

    for target in ["nodir/file", "dir", "/"] {
        let mut source: &[u8] = b"payload";
        let (code, message) = reply_code(client.put(target, &mut source).await.unwrap_err());
        assert_eq!(code, "550", "{}", target);
        assert_eq!(message, "failed to open for write", "{}", target);
    }
    assert!(!server.path().join("nodir").exists());
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[cfg(unix)]
#[tokio::test]
async fn test_stor_through_symlink_out_of_root_is_refused() {
    let server = TestServer::start().await;
    let outside = tempfile::tempdir().unwrap();
    let secret = outside.path().join("secret");
    std::fs::write(&secret, b"top secret").unwrap();
    std::os::unix::fs::symlink(&secret, server.path().join("secret_link")).unwrap();
    std::os::unix::fs::symlink(outside.path(), server.path().join("escape")).unwrap();
    let mut client = server.client().await;

    for target in ["secret_link", "escape/secret", "escape/new"] {
        let mut source: &[u8] = b"overwritten";
        let (code, message) = reply_code(client.put(target, &mut source).await.unwrap_err());
        assert_eq!(code, "550", "{}", target);
        assert_eq!(message, "failed to open for write", "{}", target);
    }
    assert_eq!(std::fs::read(&secret).unwrap(), b"top secret");
    assert!(!outside.path().join("new").exists());
}

#[tokio::test]
async fn test_size_needs_a_regular_file() {
    let server = TestServer::start().await;
    std::fs::create_dir(server.path().join("dir")).unwrap();
    let mut client = server.client().await;

    for target in ["missing", "dir"] {
        let (code, message) = reply_code(client.size(target).await.unwrap_err());
        assert_eq!(code, "550");
        assert_eq!(message, "cannot get size");
    }
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn test_cwd_into_regular_file_fails() {
    let server = TestServer::start().await;
    std::fs::write(server.path().join("plain.txt"), b"x").unwrap();
    let mut client = server.client().await;

    let (code, message) = reply_code(client.chdir("plain.txt").await.unwrap_err());
    assert_eq!(code, "550");
    assert_eq!(message, "failed to chdir");
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn test_list_of_unresolvable_path_fails() {
    let server = TestServer::start().await;
    let mut ctrl = server.raw().await;

    let _data = open_data(&mut ctrl).await;
    let reply = exchange(&mut ctrl, "LIST", "-la missing/dir").await;
    assert_eq!(reply.verb, "550");
    assert_eq!(reply.argument, "failed to list directory");
    assert_still_serving(&mut ctrl).await;
}

#[tokio::test]
async fn test_list_of_file_hides_server_root() {
    let server = TestServer::start().await;
    std::fs::write(server.path().join("hello.txt"), b"hi").unwrap();
    let mut ctrl = server.raw().await;

    let mut data = open_data(&mut ctrl).await;
    assert_eq!(exchange(&mut ctrl, "LIST", "hello.txt").await.verb, "150");
    let mut listing = Vec::new();
    receive_binary(&mut data, &mut listing, 1024).await.unwrap();
    assert_eq!(ctrl.receive_line().await.unwrap().verb, "226");

    let text = String::from_utf8(listing).unwrap();
    let root = server.path().canonicalize().unwrap();
    assert!(text.contains("hello.txt"), "{}", text);
    assert!(!text.contains(&*root.to_string_lossy()), "{}", text);
    assert!(!text.contains(&*server.path().to_string_lossy()), "{}", text);
}
