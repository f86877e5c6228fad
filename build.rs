const COMMANDS: &[&str] = &[
    "start_recording",
    "stop_recording",
    "is_recording",
    "invoke_method",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS).build();
}
