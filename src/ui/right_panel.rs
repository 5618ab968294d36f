use eframe::egui;

use super::app::MyApp;

pub fn draw_right_panel(ctx: &egui::Context, app: &mut MyApp) {
    egui::SidePanel::right("right")
        .resizable(true)
        .default_width(340.0)
        .min_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Variables");
            ui.separator();

            let mut to_clear: Option<u32> = None;

            egui::ScrollArea::vertical().show(ui, |ui| {
                if app.session.variables.is_empty() {
                    ui.label("No variables set.");
                }

                for (id, value) in app.session.variables.iter() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            ui.strong(format!("#{id:04}"));
                            if ui.small_button("❌").clicked() {
                                to_clear = Some(id);
                            }
                        });

                        let text = serde_json::to_string_pretty(value)
                            .unwrap_or_else(|_| value.to_string());
                        egui::CollapsingHeader::new(preview(&text))
                            .id_salt(("variable", id))
                            .show(ui, |ui| {
                                ui.label(egui::RichText::new(text.clone()).monospace());
                            });
                    });
                }
            });

            if let Some(id) = to_clear {
                app.session.variables.clear(id);
            }
        });
}

fn preview(text: &str) -> String {
    let first: String = text.chars().take(32).collect();
    if first.len() < text.len() {
        format!("{}…", first.replace('\n', " "))
    } else {
        first.replace('\n', " ")
    }
}
