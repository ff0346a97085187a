/*!
 * Desktop front-end for precip-rs.
 *
 * Import MeteoSwiss CSV files, tick the cities to show, pick a date range and
 * an optional function overlay; the chart redraws on every change.
 */

use chrono::{Datelike, Local, NaiveDateTime};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use precip_rs::functions::{self, NO_FUNCTION};
use precip_rs::models::from_oa_date;
use precip_rs::viz::{Mark, X_AXIS_LABEL, Y_AXIS_LABEL, marks, office_color};
use precip_rs::{CurveKind, Session};
use std::path::PathBuf;

const DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([700.0, 450.0])
            .with_title("Précipitations"),
        ..Default::default()
    };

    eframe::run_native(
        "Précipitations",
        options,
        Box::new(|_cc| Ok(Box::new(PrecipApp::new()))),
    )
}

struct PrecipApp {
    session: Session,
    from_text: String,
    to_text: String,
    function_label: String,
}

impl PrecipApp {
    fn new() -> Self {
        let mut app = Self {
            session: Session::new(Local::now().year()),
            from_text: String::new(),
            to_text: String::new(),
            function_label: NO_FUNCTION.to_string(),
        };
        app.sync_range_text();
        app
    }

    fn sync_range_text(&mut self) {
        let range = self.session.params().range;
        let fmt = |t: NaiveDateTime| t.format(DATE_INPUT_FORMAT).to_string();
        self.from_text = fmt(range.from());
        self.to_text = fmt(range.to());
    }

    fn import_dialog(&mut self) {
        let start_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV/TXT", &["csv", "txt"])
            .add_filter("Tous les fichiers", &["*"])
            .set_directory(start_dir)
            .pick_file()
        else {
            return;
        };
        // Failures are reported through the status line.
        if self.session.import_file(&path).is_ok() {
            self.sync_range_text();
        }
    }

    fn apply_range_text(&mut self) {
        if self
            .session
            .set_range_text(&self.from_text, &self.to_text)
            .is_ok()
        {
            self.sync_range_text();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        if ui.button("Importer CSV…").clicked() {
            self.import_dialog();
        }
        ui.add_space(10.0);

        ui.label("Villes");
        let names: Vec<String> = self.session.store().names().map(str::to_string).collect();
        for name in names {
            let mut checked = self.session.is_selected(&name);
            if ui.checkbox(&mut checked, name.as_str()).changed() {
                self.session.set_selected(&name, checked);
            }
        }
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.label("Du");
            let from = ui.text_edit_singleline(&mut self.from_text);
            if from.lost_focus() {
                self.apply_range_text();
            }
        });
        ui.horizontal(|ui| {
            ui.label("Au");
            let to = ui.text_edit_singleline(&mut self.to_text);
            if to.lost_focus() {
                self.apply_range_text();
            }
        });
        ui.add_space(10.0);

        egui::ComboBox::from_label("Fonction")
            .selected_text(self.function_label.as_str())
            .show_ui(ui, |ui| {
                for label in std::iter::once(NO_FUNCTION).chain(functions::labels()) {
                    ui.selectable_value(&mut self.function_label, label.to_string(), label);
                }
            });
        self.session.set_function(Some(self.function_label.as_str()));
        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui.button("Réinitialiser").clicked() {
                self.session.reset();
                self.function_label = NO_FUNCTION.to_string();
                self.sync_range_text();
            }
            if ui.button("Données de démo").clicked() {
                self.session.reset_to_demo(Local::now().year());
                self.function_label = NO_FUNCTION.to_string();
                self.sync_range_text();
            }
        });
    }

    fn chart(&self, ui: &mut egui::Ui) {
        let curves = self.session.curves();
        let date_axis = curves.iter().any(|c| c.kind == CurveKind::Series);

        Plot::new("precipitations")
            .legend(Legend::default())
            .x_axis_label(X_AXIS_LABEL)
            .y_axis_label(Y_AXIS_LABEL)
            .x_axis_formatter(move |mark, _range| {
                if date_axis {
                    from_oa_date(mark.value)
                        .map(|d| d.year().to_string())
                        .unwrap_or_default()
                } else {
                    format!("{:.1}", mark.value)
                }
            })
            .show(ui, |plot_ui| {
                for (idx, curve) in curves.iter().enumerate() {
                    let c = office_color(idx);
                    let color = egui::Color32::from_rgb(c.0, c.1, c.2);
                    // Same name on every mark keeps a single legend entry.
                    for mark in marks(curve) {
                        match mark {
                            Mark::Point((x, y)) => plot_ui.points(
                                Points::new(vec![[x, y]])
                                    .name(&curve.name)
                                    .color(color)
                                    .radius(3.0),
                            ),
                            Mark::Path(path) => {
                                let points: PlotPoints =
                                    path.into_iter().map(|(x, y)| [x, y]).collect();
                                plot_ui.line(Line::new(points).name(&curve.name).color(color));
                            }
                        }
                    }
                }
            });
    }
}

impl eframe::App for PrecipApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.session.status());
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Précipitations");
                ui.add_space(10.0);
                self.controls(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart(ui);
        });
    }
}
