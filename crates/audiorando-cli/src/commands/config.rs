use audiorando_core::EngineConfig;

pub fn run(config: &EngineConfig) {
    match serde_json::to_string_pretty(config) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("Error encoding config: {e}");
            std::process::exit(1);
        }
    }
}
