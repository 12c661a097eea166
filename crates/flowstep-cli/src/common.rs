use owo_colors::OwoColorize;

pub fn provide_error_suggestions(err_msg: &str) {
    // Mode errors
    if err_msg.contains("disabled in slave mode") {
        eprintln!("{}", "Help: Slave mode hands the main loop to the host.".yellow());
        eprintln!("    {}", "Drop --slave / FLOWSTEP_SLAVE_MODE, or drive the loop with idle() + poll()".bright_black());
    }
    else if err_msg.contains("only available in slave mode") {
        eprintln!("{}", "Help: start() is the host-driven entry point.".yellow());
        eprintln!("    {}", "Run with --slave or set FLOWSTEP_SLAVE_MODE=1".bright_black());
    }
    else if err_msg.contains("already finished") {
        eprintln!("{}", "Help: The loop returned a value and must be reset before it is driven again.".yellow());
    }

    // Configuration errors
    else if err_msg.contains("max_fps") {
        eprintln!("{}", "Help: max_fps sets the virtual clock rate.".yellow());
        eprintln!("    {}", "Example: { \"max_fps\": 60 }".bright_black());
    }
    else if err_msg.contains("unknown field") {
        eprintln!("{}", "Help: The config file contains a key flowstep does not know.".yellow());
        eprintln!("    {}", "Known keys: slave_mode, max_fps, max_frames, pace_frames".bright_black());
    }
    else if err_msg.contains(flowstep_runtime::StartupConfig::SLAVE_MODE_ENV) {
        eprintln!("{}", "Help: Use FLOWSTEP_SLAVE_MODE=1 to enable or FLOWSTEP_SLAVE_MODE=0 to disable.".yellow());
    }
    else if err_msg.contains("Failed to read config") {
        eprintln!("{}", "Help: Config file could not be read.".yellow());
        eprintln!("    {}", "Check that the file exists and you have permission to read it".bright_black());
    }
    else if err_msg.contains("Invalid config") {
        eprintln!("{}", "Help: The config file must be a JSON object.".yellow());
        eprintln!("    {}", "Example: { \"slave_mode\": true, \"max_fps\": 30 }".bright_black());
    }
}
