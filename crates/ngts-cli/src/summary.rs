use console::Style;
use ngts_core::config::GridConfig;
use ngts_core::detector::{DetectorPreset, DetectorProfile};
use ngts_core::observation::{ObservationConfig, ZeroPoint};
use ngts_core::photometry::NoiseBreakdown;
use ngts_core::survey::{SurveyAssumptions, SurveyPlan};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

fn title(s: &Styles, text: &str) {
    println!();
    println!("  {}", s.title.apply_to(text));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(text.chars().count()))
    );
    println!();
}

pub fn print_setup_summary(
    preset: &DetectorPreset,
    detector: &DetectorProfile,
    config: &ObservationConfig,
    grids: &GridConfig,
) {
    let s = Styles::new();
    title(&s, "NGTS Noise Model");

    println!("  {}", s.header.apply_to("Detector"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Preset"),
        s.method.apply_to(preset)
    );
    let (columns, rows) = detector.pixel_dimensions;
    println!(
        "    {:<14}{}",
        s.label.apply_to("Format"),
        s.value.apply_to(format!("{columns}x{rows} pix"))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Read time"),
        s.value.apply_to(format!("{:.4} s", detector.read_time()))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Read noise"),
        s.value.apply_to(format!("{} e-", detector.read_noise_e))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Full well"),
        s.value.apply_to(format!("{:.0} e-", detector.full_well_depth_e))
    );
    match detector.dark_current_e_per_s_per_pix {
        Some(rate) => println!(
            "    {:<14}{}",
            s.label.apply_to("Dark current"),
            s.value.apply_to(format!("{rate} e-/s/pix"))
        ),
        None => println!(
            "    {:<14}{}",
            s.label.apply_to("Dark current"),
            s.disabled.apply_to("not modelled")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Observation"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Exposure"),
        s.value.apply_to(format!("{} s", config.exposure_time_s))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Binning"),
        s.value.apply_to(format!("{} s", config.binning_time_s))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Airmass"),
        s.value.apply_to(config.airmass)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Sky"),
        s.value.apply_to(format!("{:.1} e-/s/pix", config.effective_sky_level()))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Aperture"),
        s.value.apply_to(format!("r = {} pix", config.aperture_radius_pix))
    );
    let zero_point = match config.zero_point {
        ZeroPoint::Scaled {
            reference_mag,
            reference_exposure_s,
        } => format!(
            "{:.3} (from {reference_mag} at {reference_exposure_s} s)",
            config.zero_point.per_second()
        ),
        ZeroPoint::Fixed(mag) => format!("{mag} (fixed)"),
    };
    println!(
        "    {:<14}{}",
        s.label.apply_to("Zero point"),
        s.value.apply_to(zero_point)
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("Scintillation"),
        s.method.apply_to(config.scintillation_model)
    );
    println!();

    println!("  {}", s.header.apply_to("Grids"));
    println!("    {}", s.label.apply_to(grids));
    println!();
}

pub fn print_breakdown(magnitude: f64, breakdown: &NoiseBreakdown) {
    let s = Styles::new();
    title(&s, &format!("Noise budget, magnitude {magnitude}"));

    let row = |label: &str, value: f64| {
        println!(
            "    {:<14}{}",
            s.label.apply_to(label),
            s.value.apply_to(format!("{value:.4e}  ({:.3} mmag)", value * 1e3))
        );
    };
    row("Source", breakdown.source);
    row("Sky", breakdown.sky);
    row("Read", breakdown.read);
    row("Scintillation", breakdown.scintillation);
    if let Some(dark) = breakdown.dark {
        row("Dark", dark);
    }
    row("Total", breakdown.total);
    println!();
}

pub fn print_survey_plan(plan: &SurveyPlan, assumptions: &SurveyAssumptions) {
    let s = Styles::new();
    title(&s, "Survey Plan");

    println!("  {}", s.header.apply_to("Assumptions"));
    let line = |label: &str, value: String| {
        println!(
            "    {:<22}{}",
            s.label.apply_to(label),
            s.value.apply_to(value)
        );
    };
    line("Exposure time", format!("{:.2} s", plan.exposure_time_s));
    line("Years", format!("{:.1}", assumptions.years));
    line(
        "Bias / dark per day",
        format!("{} / {}", assumptions.bias_per_day, assumptions.darks_per_day),
    );
    line("Flats per open day", format!("{}", assumptions.flats_per_day));
    line("Open hours per year", format!("{}", assumptions.open_hours_per_year));
    line("Telescopes", format!("{}", assumptions.telescopes));
    line("Image size", format!("{:.2} MB", assumptions.image_size_mb));
    println!();

    println!("  {}", s.header.apply_to("Frames"));
    line("Read time", format!("{:.4} s", plan.read_time_s));
    line("Exposures per hour", format!("{:.3}", plan.exposures_per_hour));
    line(
        "Open night fraction",
        format!("{:.4}", assumptions.open_night_fraction()),
    );
    line("Science images", format!("{:.0}", plan.science_images));
    line("Bias frames", format!("{:.0}", plan.bias_frames.ceil()));
    line("Dark frames", format!("{:.0}", plan.dark_frames.ceil()));
    line("Flat frames", format!("{:.0}", plan.flat_frames.ceil()));
    line(
        "Calibration frames",
        format!("{:.0}", plan.calibration_frames().ceil()),
    );
    line("Total frames", format!("{:.0}", plan.total_frames().ceil()));
    println!();

    println!("  {}", s.header.apply_to("Storage"));
    line("Science", format!("{:.2} TB", plan.science_storage_tb));
    line("Calibration", format!("{:.2} TB", plan.calibration_storage_tb));
    line(
        "Calibration share",
        format!("{:.3}%", plan.calibration_fraction * 100.0),
    );
    line("Total", format!("{:.3} TB", plan.total_storage_tb));
    println!();
}
