use outbreak::series::TrajectoryRow;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const CONFIG_CONTENTS: &str = r#"
[disease]
name = "NFLItis"
beta = 0.2
latent_duration = 1
contagious_duration = 1

[init]
population = 1000.0
latent = 1.0
contagious = 0.0
zombified = 0.0

[output]
n_days = 99
"#;

fn setup(name: &str, contents: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, contents).expect("failed to write config file");
    config_path
}

fn run_bin(config_path: &Path, args: &[&str]) -> Output {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_outbreak"));

    let config_path_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    Command::new(bin)
        .arg("--config")
        .arg(config_path_str)
        .args(args)
        .output()
        .expect("failed to execute command")
}

fn stdout_of(output: &Output, args: &[&str]) -> String {
    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );

    stdout_str.to_string()
}

#[test]
fn run_prints_summary() {
    let config_path = setup("run_prints_summary", CONFIG_CONTENTS);

    let args = ["run", "--days", "2"];
    let stdout = stdout_of(&run_bin(&config_path, &args), &args);

    assert!(stdout.contains("Disease: NFLItis"));
    assert!(stdout.contains("Healthy: 999.000000"));
    assert!(stdout.contains("Contagious: 1.000000"));
    assert!(stdout.contains("Days Elapsed: 2"));
}

#[test]
fn trajectory_conserves_population() {
    let config_path = setup("trajectory_conserves_population", CONFIG_CONTENTS);

    let args = ["trajectory"];
    let stdout = stdout_of(&run_bin(&config_path, &args), &args);

    let mut reader = csv::Reader::from_reader(stdout.as_bytes());
    let headers = reader.headers().expect("failed to read headers").clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        ["day", "healthy", "latent", "contagious", "zombified"]
    );

    let rows: Vec<TrajectoryRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .expect("failed to deserialize rows");
    assert_eq!(rows.len(), 100);

    for (i_row, row) in rows.iter().enumerate() {
        assert_eq!(row.day, i_row);
        let sum = row.healthy + row.latent + row.contagious + row.zombified;
        assert!((sum - 1000.0).abs() < 1e-6, "day {i_row} sums to {sum}");
    }

    let zombified: Vec<f64> = rows.iter().map(|row| row.zombified).collect();
    assert!(zombified.windows(2).all(|pair| pair[1] >= pair[0]));
    assert!(zombified[99] > zombified[0]);
}

#[test]
fn invalid_config_fails() {
    let contents = CONFIG_CONTENTS.replace("latent_duration = 1", "latent_duration = 0");
    let config_path = setup("invalid_config_fails", &contents);

    let output = run_bin(&config_path, &["run"]);
    assert!(!output.status.success());

    let stderr_str = String::from_utf8_lossy(&output.stderr);
    assert!(stderr_str.contains("invalid latent duration"));
}

#[test]
fn missing_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("missing_config_fails");
    fs::remove_dir_all(&test_dir).ok();

    let output = run_bin(&test_dir.join("config.toml"), &["trajectory"]);
    assert!(!output.status.success());
}

#[test]
fn too_many_days_fails() {
    let config_path = setup("too_many_days_fails", CONFIG_CONTENTS);

    for command in ["run", "trajectory"] {
        let output = run_bin(&config_path, &[command, "--days", "100001"]);
        assert!(!output.status.success());

        let stderr_str = String::from_utf8_lossy(&output.stderr);
        assert!(stderr_str.contains("invalid number of days"));
    }
}
