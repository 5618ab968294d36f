use eframe::egui;

use super::app::MyApp;

pub fn draw_left_panel(ctx: &egui::Context, app: &mut MyApp) {
    egui::SidePanel::left("left")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                draw_params(ui, app);
                ui.separator();
                draw_files(ui, app);
                ui.separator();

                ui.label("UI Scale");
                if ui
                    .add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0))
                    .drag_stopped()
                {
                    app.persist_settings();
                }

                if let Some(status) = app.ui.status.clone() {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, status);
                    if ui.small_button("Dismiss").clicked() {
                        app.ui.status = None;
                    }
                }
            });
        });
}

/* =========================
   Plugin parameters
   ========================= */

fn draw_params(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("Plugin Parameters");

    let p = &mut app.ui.params_draft;

    ui.label("API Key");
    ui.add(egui::TextEdit::singleline(&mut p.api_key).password(true));

    ui.label("GPT Response Variable ID");
    ui.add(egui::DragValue::new(&mut p.gpt_response_variable_id).range(1..=5000));

    ui.label("Player Name");
    ui.text_edit_singleline(&mut p.player_name);

    ui.label("Player Account ID");
    ui.text_edit_singleline(&mut p.player_account_id);

    ui.label("Endpoint");
    ui.text_edit_singleline(&mut p.endpoint);

    if ui.button("Apply & Save").clicked() {
        app.apply_params();
    }
}

/* =========================
   Files
   ========================= */

fn draw_files(ui: &mut egui::Ui, app: &mut MyApp) {
    ui.heading("Files");

    if ui.button("Load event script…").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Event script", &["json"])
            .pick_file()
        {
            app.load_event_script(&path);
        }
    }
    if ui.button("Use demo event").clicked() {
        app.use_demo_events();
    }

    if ui.button("Faces folder…").clicked() {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            app.settings.faces_dir = Some(dir);
            app.faces.clear();
            app.persist_settings();
        }
    }
    if let Some(dir) = &app.settings.faces_dir {
        ui.small(dir.display().to_string());
    }

    ui.horizontal(|ui| {
        if ui.button("Save game…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Save", &["json"])
                .set_file_name("save.json")
                .save_file()
            {
                app.save_game(&path);
            }
        }
        if ui.button("Load game…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Save", &["json"])
                .pick_file()
            {
                app.load_game(&path);
            }
        }
    });
}
