mod ui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let params = ui::settings_io::load_params();
    let settings = ui::settings_io::load_settings();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "DialogCraft",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::MyApp::new(params, settings)))),
    )
}
