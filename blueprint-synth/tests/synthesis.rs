use blueprint_devkit::{sample_snapshot, RecordingReporter, SnapshotBuilder, TestWorkspace};
use blueprint_synth::{MatchStrategy, MergeOutcome, NullReporter, SynthError};
use serde_yaml::Value;

const OUTPUTS: [&str; 6] = ["packages.yml", "services.yml", "network.yml", "ssh.yml", "crontab.yml", "web1.yml"];

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_full_run_writes_every_playbook() {
    blueprint_devkit::init_test_logging();
    let ws = TestWorkspace::new().unwrap();
    let path = ws.write_snapshot("snapshot.json", &sample_snapshot()).unwrap();
    let reporter = RecordingReporter::new();

    let summary = blueprint_synth::run(&path, &ws.config, &reporter).unwrap();

    assert_eq!(reporter.written_files(), OUTPUTS);
    assert_eq!(reporter.merge_outcomes(), [MergeOutcome::Created]);
    assert_eq!(summary.inventory_outcome, MergeOutcome::Created);
    assert!(summary.index.ends_with("web1.yml"));
    assert_eq!(
        summary.follow_on_command(),
        format!(
            "ansible-playbook -i {} {}",
            ws.inventory_path().display(),
            ws.output_dir().join("web1.yml").display()
        )
    );

    let inventory = std::fs::read_to_string(ws.inventory_path()).unwrap();
    assert_eq!(inventory, "web1 ansible_host=1.2.3.4 ansible_user=root ansible_port=2222");

    let crontab = yaml(&ws.read_output("crontab.yml").unwrap());
    let tasks = crontab[0]["tasks"].as_sequence().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1]["name"].as_str(), Some("Root crontab entry 2"));
    assert_eq!(
        tasks[1]["cron"]["job"].as_str(),
        Some("/usr/bin/report.sh --weekly > /var/log/report.log 2>&1")
    );

    let ssh = yaml(&ws.read_output("ssh.yml").unwrap());
    let content = ssh[0]["tasks"][0]["copy"]["content"].as_str().unwrap();
    assert!(content.starts_with("Include /etc/ssh/sshd_config.d/*.conf\nPort 2222\n"));
    assert!(!content.contains('#'));
    assert_eq!(ssh[0]["tasks"][1]["service"]["state"].as_str(), Some("restarted"));

    assert!(reporter.notices().iter().any(|n| n.contains("    PermitRootLogin prohibit-password")));
}

#[test]
fn test_rerun_is_byte_identical_and_inventory_stable() {
    let ws = TestWorkspace::new().unwrap();
    let path = ws.write_snapshot("snapshot.json", &sample_snapshot()).unwrap();

    blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();
    let first: Vec<_> = OUTPUTS.iter().map(|f| ws.read_output(f).unwrap()).collect();
    let inventory = std::fs::read_to_string(ws.inventory_path()).unwrap();

    let summary = blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();
    let second: Vec<_> = OUTPUTS.iter().map(|f| ws.read_output(f).unwrap()).collect();

    assert_eq!(first, second);
    assert_eq!(summary.inventory_outcome, MergeOutcome::AlreadyPresent);
    assert_eq!(std::fs::read_to_string(ws.inventory_path()).unwrap(), inventory);
}

#[test]
fn test_packages_example() {
    let ws = TestWorkspace::new().unwrap();
    let path = ws
        .write_raw(
            "web1.json",
            r#"{"hostname":"web1","installed_packages":[{"name":"nginx"},{"name":"curl"}]}"#,
        )
        .unwrap();

    blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();

    let packages = yaml(&ws.read_output("packages.yml").unwrap());
    let tasks = packages[0]["tasks"].as_sequence().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["apt"]["name"], Value::from(vec!["nginx", "curl"]));
    assert_eq!(tasks[0]["apt"]["state"].as_str(), Some("present"));
}

#[test]
fn test_sparse_snapshot_gives_minimal_documents() {
    let ws = TestWorkspace::new().unwrap();
    let path = ws.write_raw("bare.json", r#"{"hostname":"bare"}"#).unwrap();
    let reporter = RecordingReporter::new();

    blueprint_synth::run(&path, &ws.config, &reporter).unwrap();

    for file in ["packages.yml", "services.yml", "ssh.yml", "crontab.yml"] {
        let doc = yaml(&ws.read_output(file).unwrap());
        assert!(doc[0]["tasks"].as_sequence().unwrap().is_empty(), "{file}");
    }
    let network = yaml(&ws.read_output("network.yml").unwrap());
    assert_eq!(
        network[0]["tasks"][0]["debug"]["msg"].as_str(),
        Some("Current network configuration: N/A")
    );

    assert!(ws.output_exists("bare.yml"));
    let inventory = std::fs::read_to_string(ws.inventory_path()).unwrap();
    assert_eq!(inventory, "bare ansible_host=unknown ansible_user=root ansible_port=22");
}

#[test]
fn test_bad_json_writes_nothing() {
    let ws = TestWorkspace::new().unwrap();
    let path = ws.write_raw("broken.json", "{\"hostname\": \"web1\",").unwrap();

    let err = blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap_err();
    assert!(matches!(err, SynthError::Snapshot { .. }));
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_missing_snapshot_is_a_read_error() {
    let ws = TestWorkspace::new().unwrap();
    let err = blueprint_synth::run(&ws.root().join("absent.json"), &ws.config, &NullReporter).unwrap_err();
    assert!(matches!(err, SynthError::Read { .. }));
}

#[test]
fn test_unsafe_hostname_writes_nothing() {
    let ws = TestWorkspace::new().unwrap();
    let snapshot = SnapshotBuilder::new("../../etc/cron.d").package("curl").build();
    let path = ws.write_snapshot("evil.json", &snapshot).unwrap();

    let err = blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap_err();
    assert!(matches!(err, SynthError::InvalidHostname(_)));
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_prefix_hostnames_across_runs() {
    let ws = TestWorkspace::new().unwrap();
    let web1 = ws
        .write_snapshot("web1.json", &SnapshotBuilder::new("web1").public_ip("1.2.3.4").build())
        .unwrap();
    let web10 = ws
        .write_snapshot("web10.json", &SnapshotBuilder::new("web10").public_ip("5.6.7.8").build())
        .unwrap();

    assert_eq!(blueprint_synth::run(&web1, &ws.config, &NullReporter).unwrap().inventory_outcome, MergeOutcome::Created);
    assert_eq!(blueprint_synth::run(&web10, &ws.config, &NullReporter).unwrap().inventory_outcome, MergeOutcome::Appended);
    assert_eq!(
        blueprint_synth::run(&web1, &ws.config, &NullReporter).unwrap().inventory_outcome,
        MergeOutcome::AlreadyPresent
    );

    let inventory = std::fs::read_to_string(ws.inventory_path()).unwrap();
    assert_eq!(inventory.lines().count(), 2);
    assert!(inventory.ends_with("web10 ansible_host=5.6.7.8 ansible_user=root ansible_port=22"));
}

#[test]
fn test_substring_strategy_skips_shorter_host() {
    let ws = TestWorkspace::new().unwrap();
    let web10 = ws
        .write_snapshot("web10.json", &SnapshotBuilder::new("web10").public_ip("5.6.7.8").build())
        .unwrap();
    let web1 = ws
        .write_snapshot("web1.json", &SnapshotBuilder::new("web1").public_ip("1.2.3.4").build())
        .unwrap();

    blueprint_synth::run(&web10, &ws.config, &NullReporter).unwrap();
    let summary = blueprint_synth::run(&web1, &ws.config, &NullReporter).unwrap();
    assert_eq!(summary.inventory_outcome, MergeOutcome::AlreadyPresent);

    let mut config = ws.config.clone();
    config.inventory.match_strategy = MatchStrategy::Exact;
    let summary = blueprint_synth::run(&web1, &config, &NullReporter).unwrap();
    assert_eq!(summary.inventory_outcome, MergeOutcome::Appended);
    assert_eq!(std::fs::read_to_string(ws.inventory_path()).unwrap().lines().count(), 2);
}

#[test]
fn test_private_key_and_user_from_config() {
    let mut ws = TestWorkspace::new().unwrap();
    ws.config.inventory.user = "admin".into();
    ws.config.inventory.private_key_file = Some("/home/admin/.ssh/id_ed25519".into());
    let path = ws
        .write_snapshot("db.json", &SnapshotBuilder::new("db1").public_ip("10.1.1.1").build())
        .unwrap();

    blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();
    assert_eq!(
        std::fs::read_to_string(ws.inventory_path()).unwrap(),
        "db1 ansible_host=10.1.1.1 ansible_user=admin ansible_port=22 ansible_ssh_private_key_file=/home/admin/.ssh/id_ed25519"
    );
}

#[test]
fn test_subsystem_hostname_cannot_clobber_playbook() {
    let ws = TestWorkspace::new().unwrap();
    let snapshot = SnapshotBuilder::new("packages").packages(&["nginx", "curl"]).build();
    let path = ws.write_snapshot("packages.json", &snapshot).unwrap();

    let err = blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap_err();
    assert!(matches!(err, SynthError::InvalidHostname(ref name) if name == "packages"));
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_empty_hostname_falls_back_to_unknown() {
    let ws = TestWorkspace::new().unwrap();
    let path = ws
        .write_raw("blank.json", r#"{"hostname": "", "public_ip": "1.2.3.4"}"#)
        .unwrap();

    let summary = blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();
    assert_eq!(summary.hostname, "unknown");
    assert!(ws.output_exists("unknown.yml"));
    assert!(std::fs::read_to_string(ws.inventory_path()).unwrap().starts_with("unknown ansible_host=1.2.3.4 "));
}

#[test]
fn test_yaml11_boolean_words_stay_strings() {
    let ws = TestWorkspace::new().unwrap();
    let snapshot = SnapshotBuilder::new("web1")
        .packages(&["yes", "nginx"])
        .crontab("root", "0 * * * * yes")
        .build();
    let path = ws.write_snapshot("web1.json", &snapshot).unwrap();
    blueprint_synth::run(&path, &ws.config, &NullReporter).unwrap();

    let packages = ws.read_output("packages.yml").unwrap();
    assert!(packages.contains("- 'yes'"), "{packages}");
    let crontab = ws.read_output("crontab.yml").unwrap();
    assert!(crontab.contains("job: 'yes'"), "{crontab}");
    assert_eq!(yaml(&crontab)[0]["tasks"][0]["cron"]["job"].as_str(), Some("yes"));
}
