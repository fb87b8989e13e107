// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 __  __          _ _                                _
|  \/  | ___  __| (_) __ _     __ _ _ __   __ _| |_   _ _______ _ __
| |\/| |/ _ \/ _` | |/ _` |   / _` | '_ \ / _` | | | | |_  / _ \ '__|
| |  | |  __/ (_| | | (_| |  | (_| | | | | (_| | | |_| |/ /  __/ |
|_|  |_|\___|\__,_|_|\__,_|   \__,_|_| |_|\__,_|_|\__, /___\___|_|
                                                  |___/

    Describe a clip, get an AI analysis back
"#;
    println!("{}", banner);
}
