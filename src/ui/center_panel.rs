use eframe::egui;

use super::app::MyApp;
use super::faces::FACE_SIZE;

pub fn draw_center_panel(ctx: &egui::Context, app: &mut MyApp) {
    draw_prompt_window(ctx, app);

    // ---------- Message window ----------
    egui::TopBottomPanel::bottom("message_window")
        .min_height(FACE_SIZE as f32 + 24.0)
        .show(ctx, |ui| {
            if !app.message_box.visible {
                ui.weak("…");
                return;
            }

            let message = app.message_box.message.clone();
            let face = app.faces.get(
                ctx,
                app.settings.faces_dir.as_ref(),
                &message.face_name,
                message.face_index,
            );

            ui.horizontal_top(|ui| {
                if let Some(texture) = &face {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .fit_to_exact_size(egui::vec2(FACE_SIZE as f32, FACE_SIZE as f32)),
                    );
                }

                ui.vertical(|ui| {
                    if !message.speaker_name.is_empty() {
                        ui.strong(&message.speaker_name);
                    }
                    ui.label(egui::RichText::new(&message.text).monospace());
                });
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::BOTTOM), |ui| {
                if ui.button("▶ Continue").clicked() {
                    app.dismiss_message();
                }
            });
        });

    // ---------- Map ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Map");
        ui.separator();

        let busy = app.is_busy();
        let events: Vec<(u32, String)> = app
            .map
            .events()
            .map(|e| (e.id, e.name.clone()))
            .collect();

        for (id, name) in events {
            ui.horizontal(|ui| {
                let label = if name.is_empty() {
                    format!("Event {id}")
                } else {
                    format!("{name} (event {id})")
                };
                ui.label(label);
                if ui
                    .add_enabled(!busy, egui::Button::new("💬 Talk"))
                    .clicked()
                {
                    app.talk_to(id);
                }
            });
        }

        ui.separator();
        if app.session.in_flight() > 0 {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Waiting for the character to answer…");
            });
        }
    });
}

fn draw_prompt_window(ctx: &egui::Context, app: &mut MyApp) {
    if !app.ui.prompt_open {
        return;
    }

    let input_id = egui::Id::new("prompt_input_box");
    let mut answer: Option<Option<String>> = None;

    egui::Window::new("Enter your message:")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(&mut app.ui.prompt_text)
                    .id(input_id)
                    .hint_text("hi")
                    .desired_rows(3),
            );
            response.request_focus();

            let enter = response.has_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() || enter {
                    answer = Some(Some(app.ui.prompt_text.trim_end_matches('\n').to_string()));
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(None);
                }
            });
        });

    if let Some(answer) = answer {
        app.submit_prompt(answer);
    }
}
