#![forbid(unsafe_code)]

fn main() {
    let cli = territory_cli::cli::parse_from_env();
    let json = cli.log_json;
    if let Err(error) = territory_cli::run(cli) {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "kind": error.kind(),
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("territory: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
