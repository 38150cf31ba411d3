use std::env;
use std::process::{exit, Command};

// Proxy so `cargo run` at the workspace root starts the HTTP gateway.
fn main() {
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    let mut binary = env::current_dir()
        .expect("Failed to get current directory")
        .join("target")
        .join(profile)
        .join("api-gateway");

    if cfg!(target_os = "windows") {
        binary.set_extension("exe");
    }

    println!("Launching {}", binary.display());

    let status = Command::new(&binary)
        .args(env::args().skip(1))
        .status()
        .unwrap_or_else(|e| {
            eprintln!("Failed to launch {}: {}", binary.display(), e);
            exit(1);
        });

    exit(status.code().unwrap_or(1));
}
