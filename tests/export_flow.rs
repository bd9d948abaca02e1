use cornerglow::color::{Color, RandomColor, RandomSeed};
use cornerglow::export::{ExportSettings, SizeMode};
use cornerglow::picker::{corner_pickers, Corner};
use cornerglow::screen::FixedScreen;
use cornerglow::state::ShellState;
use cornerglow::storage::{write_artifact, ExportStorage};
use cornerglow::surface::{load_image, ImageKind};
use cornerglow::{ExportOutcome, GradientShell};

fn png_settings() -> ExportSettings {
    ExportSettings {
        kind: ImageKind::Png,
        ..ExportSettings::default()
    }
}

fn seeded_shell(settings: ExportSettings) -> GradientShell {
    let mut shell = GradientShell::new([Color::default(); 4], settings);
    let mut rng = RandomSeed::Text("cornerglow".to_string()).rng();
    shell.randomize(&RandomColor::new(), &mut rng);
    shell
        .handle_resize(64, 36)
        .expect("display surface should allocate");
    shell
}

#[test]
fn explicit_jpeg_export_decodes_to_requested_size_and_keeps_display() {
    let mut shell = seeded_shell(ExportSettings::default());
    let live = shell.surface().clone();

    shell.toggle_export_modal().expect("modal should open");
    shell.set_export_width(100);
    shell.set_export_height(50);
    let request = shell.begin_export().expect("confirm should be accepted");
    let outcome = shell
        .complete_export(request)
        .expect("export should succeed");

    assert_eq!(outcome, ExportOutcome::Completed);
    let url = shell.data_url().expect("data url should be published");
    assert!(url.starts_with("data:image/jpeg;base64,"));
    let artifact = shell.artifact().expect("artifact should be stored");
    let image = artifact.load_image().expect("jpeg should decode");
    assert_eq!(image.dimensions(), (100, 50));
    assert_eq!(shell.surface(), &live);
    assert_eq!(shell.state(), ShellState::Configuring);
}

#[test]
fn cancelling_during_feedback_delay_discards_the_export() {
    let mut shell = seeded_shell(ExportSettings::default());
    shell.open_export_modal().expect("modal should open");
    let request = shell.begin_export().expect("confirm should be accepted");
    assert!(shell.export_in_progress());

    shell.cancel_export().expect("cancel should close the modal");
    let outcome = shell
        .complete_export(request)
        .expect("stale completion is not an error");

    assert_eq!(outcome, ExportOutcome::Discarded);
    assert!(shell.data_url().is_none());
    assert_eq!(shell.state(), ShellState::Live);
}

#[test]
fn screen_sized_png_export_is_saved_to_disk() {
    let mut shell = seeded_shell(png_settings());
    shell.open_export_modal().expect("modal should open");
    shell
        .follow_screen_size(&FixedScreen::available(320, 200))
        .expect("fixed screen should answer");
    assert_eq!(shell.size_mode(), SizeMode::FollowScreen);

    let request = shell.begin_export().expect("confirm should be accepted");
    shell
        .complete_export(request)
        .expect("export should succeed");
    let artifact = shell.artifact().expect("artifact should be stored");

    let dir = std::env::temp_dir().join(format!("cornerglow-flow-{}", std::process::id()));
    let saved = ExportStorage::with_paths(dir.clone())
        .save_artifact(artifact)
        .expect("artifact should be saved");
    let explicit = dir.join("nested").join("explicit.png");
    write_artifact(artifact, &explicit).expect("explicit path should be written");

    for path in [saved, explicit] {
        let bytes = std::fs::read(&path).expect("file should exist");
        let image = load_image(&bytes).expect("png should decode");
        assert_eq!(image.dimensions(), (320, 200));
        let top_left = shell.color(Corner::TopLeft);
        assert_eq!(
            image.get_pixel(0, 0).0,
            [top_left.r, top_left.g, top_left.b, 255]
        );
    }

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn picker_completion_updates_the_owning_shell() {
    let mut shell = seeded_shell(png_settings());
    let mut pickers = corner_pickers();
    let picker = &mut pickers[Corner::BottomRight.index()];

    assert!(picker.toggle());
    picker.complete(Color::new(12, 34, 56, 200), |corner, color| {
        shell.select_color(corner, color);
    });
    picker.dismiss();

    assert!(!picker.is_visible());
    assert_eq!(shell.color(Corner::BottomRight), Color::new(12, 34, 56, 200));
    assert_eq!(shell.surface().pixel(63, 35), Some([12, 34, 56, 255]));
}
