mod common;

use common::{ScriptedTransport, DF_OUTPUT, FREE_OUTPUT, PING_DOWN, PING_OK};
use ssh_bottle::catalog::{
    DiskEntry, MemoryUsage, Operation, OperationResult, ALREADY_INSTALLED, NO_ROUTE,
};
use ssh_bottle::probe::ConnectivityProbe;
use ssh_bottle::scroll::Scroll;
use ssh_bottle::session::Session;
use std::net::TcpListener;
use std::time::Duration;

fn cast(transport: &ScriptedTransport, scroll: &str) -> ssh_bottle::catalog::NodeResults {
    Session::remote("node.lan", Box::new(transport.clone()), "8.8.8.8", true)
        .execute(&Scroll::parse(scroll).unwrap())
        .unwrap()
}

#[test]
fn test_install_short_circuits_without_internet() {
    let transport = ScriptedTransport::new().respond("ping", PING_DOWN);
    let results = cast(&transport, "install vim");

    assert_eq!(
        results.get(Operation::Install),
        Some(&OperationResult::Install(NO_ROUTE.into()))
    );
    assert_eq!(transport.issued(), vec!["ping 8.8.8.8 -W 1 -c 1"]);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_install_short_circuits_when_installed() {
    let transport = ScriptedTransport::new()
        .respond("ping", PING_OK)
        .respond("dpkg", "vim\t\t\t\t\t\tinstall\n");
    let results = cast(&transport, "install vim");

    assert_eq!(
        results.get(Operation::Install),
        Some(&OperationResult::Install(ALREADY_INSTALLED.into()))
    );
    assert!(transport.issued().iter().all(|i| !i.contains("apt-get")));
}

#[test]
fn test_install_runs_apt_get() {
    let transport = ScriptedTransport::new()
        .respond("ping", PING_OK)
        .respond("apt-get", "Setting up vim (2:9.0) ...\n");
    let results = cast(&transport, "install vim");

    assert_eq!(
        results.get(Operation::Install),
        Some(&OperationResult::Install("Setting up vim (2:9.0) ...".into()))
    );
    assert_eq!(
        transport.issued().last().map(String::as_str),
        Some("apt-get update && apt-get install vim -y")
    );
}

#[test]
fn test_diagnostics_scroll() {
    let transport = ScriptedTransport::new()
        .respond("date", "Thu Oct 16 10:00:00 UTC 2026\n")
        .respond("pwd", "/home/pi\n")
        .respond("cat /sys/class/thermal", "48312\n")
        .respond("df -h", DF_OUTPUT)
        .respond("free -h", FREE_OUTPUT)
        .respond("test -f", "0\n")
        .respond("test -d", "1\n")
        .respond("apt-cache", "")
        .respond("dpkg", "")
        .respond("ping", PING_OK);

    let results = cast(
        &transport,
        "date\npwd\ntemperature\ndf\nmemory\nfile_exists? /etc/hosts\n\
         directory_exists? /etc/hosts\ninstallable? nosuchpkg\ninstalled? nosuchpkg\ninternet?",
    );

    assert_eq!(
        results.get(Operation::Temperature),
        Some(&OperationResult::Temperature("48312".into()))
    );
    match results.get(Operation::DiskSpace) {
        Some(OperationResult::DiskSpace(usage)) => assert_eq!(
            usage.root,
            Some(DiskEntry {
                size: "10G".into(),
                used: "4.0G".into(),
                avail: "5.5G".into(),
            })
        ),
        other => panic!("unexpected disk result: {:?}", other),
    }
    assert_eq!(
        results.get(Operation::Memory),
        Some(&OperationResult::Memory(Some(MemoryUsage {
            total: "7.6G".into(),
            used: "2.1G".into(),
            available: "5.0G".into(),
        })))
    );
    assert_eq!(
        results.get(Operation::FileExists),
        Some(&OperationResult::FileExists(true))
    );
    assert_eq!(
        results.get(Operation::DirectoryExists),
        Some(&OperationResult::DirectoryExists(false))
    );
    assert_eq!(
        results.get(Operation::Installable),
        Some(&OperationResult::Installable(false))
    );
    assert_eq!(
        results.get(Operation::Installed),
        Some(&OperationResult::Installed(None))
    );
    assert_eq!(
        results.get(Operation::Internet),
        Some(&OperationResult::Internet(true))
    );
    assert_eq!(results.len(), 10);
}

#[test]
fn test_parse_misses_do_not_fail() {
    let transport = ScriptedTransport::new()
        .respond("df -h", "df: command not found\n")
        .respond("free -h", "");
    let results = cast(&transport, "disk_space; memory");

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "disk_space": {}, "memory": null })
    );
}

#[test]
fn test_ping_against_closed_port() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let probe = ConnectivityProbe {
        port,
        timeout: Duration::from_millis(500),
        extra_attempts: 4,
        delay: Duration::from_millis(5),
    };

    let results = Session::remote(
        "127.0.0.1",
        Box::new(ScriptedTransport::new()),
        "8.8.8.8",
        false,
    )
    .with_probe(probe)
    .execute(&Scroll::parse("ping").unwrap())
    .unwrap();

    match results.get(Operation::Ping) {
        Some(OperationResult::Ping(Some(ms))) => assert!(*ms >= 0.0 && *ms <= 500.0),
        other => panic!("unexpected ping result: {:?}", other),
    }
}

#[test]
fn test_ping_with_invalid_dns_server_is_null() {
    let results = Session::remote(
        "node.lan",
        Box::new(ScriptedTransport::new()),
        "not-an-ip",
        false,
    )
    .execute(&Scroll::parse("ping").unwrap())
    .unwrap();

    assert_eq!(results.get(Operation::Ping), Some(&OperationResult::Ping(None)));
    assert_eq!(
        serde_json::to_string(&results).unwrap(),
        r#"{"ping":null}"#
    );
}
