//! End-to-end runs with the native backend; no ffmpeg required.

use image::{DynamicImage, GenericImageView, ImageFormat};
use plate_core::config::EncoderBackend;
use plate_core::pipeline::SourceFormat;
use plate_core::{Config, DerivativeGenerator, FileOutcome, PipelineError, RunOptions};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn native_config() -> Config {
    let mut config = Config::default();
    config.encoder.backend = EncoderBackend::Native;
    config.heif.converters = vec!["/nonexistent/plate/heif-convert".to_string()];
    config
}

fn write_source(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    let image = DynamicImage::new_rgb8(width, height);
    image.save_with_format(&path, format).unwrap();
    path
}

fn list_files(root: &Path) -> Vec<String> {
    let mut out: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    out.sort();
    out
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

#[tokio::test]
async fn single_jpeg_produces_exactly_six_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_source(input.path(), "00361.jpg", 1200, 800, ImageFormat::Jpeg);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    let summary = generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.generated, 1);
    assert_eq!(
        list_files(output.path()),
        vec![
            "00361-primary-1200.webp",
            "00361-primary-1600.webp",
            "00361-primary-2400.webp",
            "00361-primary-800.webp",
            "thumbs/00361-thumb-192.webp",
            "thumbs/00361-thumb-96.webp",
        ]
    );
}

#[tokio::test]
async fn derivative_dimensions() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_source(input.path(), "tall.png", 1000, 1501, ImageFormat::Png);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();

    let out = output.path();
    // 800 * 1501 / 1000 = 1200.8 -> 1200
    assert_eq!(dimensions(&out.join("tall-primary-800.webp")), (800, 1200));
    // Narrower than every other target: kept at source width, height made even.
    assert_eq!(dimensions(&out.join("tall-primary-1200.webp")), (1000, 1500));
    assert_eq!(dimensions(&out.join("tall-primary-2400.webp")), (1000, 1500));
    assert_eq!(dimensions(&out.join("thumbs/tall-thumb-96.webp")), (96, 96));
    assert_eq!(dimensions(&out.join("thumbs/tall-thumb-192.webp")), (192, 192));
}

#[tokio::test]
async fn rerun_is_idempotent() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_source(input.path(), "00361.tif", 900, 600, ImageFormat::Tiff);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();
    let first: Vec<_> = list_files(output.path())
        .iter()
        .map(|f| (f.clone(), dimensions(&output.path().join(f))))
        .collect();

    generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();
    let second: Vec<_> = list_files(output.path())
        .iter()
        .map(|f| (f.clone(), dimensions(&output.path().join(f))))
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn extension_case_is_ignored() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_source(input.path(), "FOO.JPG", 400, 300, ImageFormat::Jpeg);
    write_source(input.path(), "bar.jpg", 400, 300, ImageFormat::Jpeg);
    write_source(input.path(), "baz.JpG", 400, 300, ImageFormat::Jpeg);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    let summary = generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.generated, 3);
    for id in ["FOO", "bar", "baz"] {
        assert!(output.path().join(format!("{id}-primary-800.webp")).is_file());
    }
}

#[tokio::test]
async fn heic_without_converter_is_skipped() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_source(input.path(), "IMG_0042.heic", 400, 300, ImageFormat::Jpeg);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    assert!(generator.converter().is_none());
    let summary = generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.generated, 0);
    match &summary.files[0].outcome {
        FileOutcome::Skipped { reason } => assert!(reason.contains("IMG_0042.heic")),
        other => panic!("expected skip, got {:?}", other),
    }
    assert!(list_files(output.path()).is_empty());
}

#[tokio::test]
async fn empty_input_fails() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("notes.md"), b"hello").unwrap();

    let generator = DerivativeGenerator::from_config(native_config()).await;
    let err = generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoInputFiles { .. }));
}

#[tokio::test]
async fn corrupt_source_aborts_run() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("a.jpg"), b"definitely not a jpeg").unwrap();
    write_source(input.path(), "b.jpg", 400, 300, ImageFormat::Jpeg);

    let generator = DerivativeGenerator::from_config(native_config()).await;
    let err = generator
        .run(input.path(), output.path(), &RunOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Decode { .. }));
    assert!(!output.path().join("b-primary-800.webp").exists());
}

#[test]
fn heic_sources_are_classified() {
    assert_eq!(
        SourceFormat::from_path(Path::new("x.HeIf")),
        SourceFormat::Heif
    );
}

/// A stand-in `heif-convert` that copies its input (a JPEG with a .heic
/// name) to the requested output and records the scratch path it was given.
#[cfg(unix)]
mod with_converter {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    fn stub_converter(dir: &Path, log: &Path) -> PathBuf {
        let path = dir.join("heif-convert");
        let script = format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"--version\" ] && exit 0\n\
             cp \"$3\" \"$4\"\n\
             dirname \"$4\" >> \"{}\"\n",
            log.display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn heic_is_converted_and_scratch_removed() {
        let tools = tempfile::tempdir().unwrap();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let log = tools.path().join("scratch.log");
        let converter = stub_converter(tools.path(), &log);

        write_source(input.path(), "IMG_0001.HEIC", 640, 480, ImageFormat::Jpeg);
        write_source(input.path(), "IMG_0002.heif", 480, 640, ImageFormat::Jpeg);

        let mut config = native_config();
        config.heif.converters = vec![converter.to_string_lossy().into_owned()];
        let generator = DerivativeGenerator::from_config(config).await;
        assert!(generator.converter().is_some());

        let summary = generator
            .run(input.path(), output.path(), &RunOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.generated, 2);
        assert_eq!(
            dimensions(&output.path().join("IMG_0002-primary-800.webp")),
            (480, 640)
        );

        // Both conversions shared one scratch directory, and it is gone now.
        let logged = std::fs::read_to_string(&log).unwrap();
        let dirs: Vec<&str> = logged.lines().collect();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs[0], dirs[1]);
        assert!(!Path::new(dirs[0]).exists());
    }

    #[tokio::test]
    async fn cancelled_run_removes_scratch() {
        let tools = tempfile::tempdir().unwrap();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let log = tools.path().join("scratch.log");
        let converter = tools.path().join("heif-convert");
        let script = format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"--version\" ] && exit 0\n\
             cp \"$3\" \"$4\"\n\
             dirname \"$4\" >> \"{}\"\n\
             exec sleep 5\n",
            log.display()
        );
        std::fs::write(&converter, script).unwrap();
        std::fs::set_permissions(&converter, std::fs::Permissions::from_mode(0o755)).unwrap();

        write_source(input.path(), "IMG_0001.heic", 64, 48, ImageFormat::Jpeg);

        let mut config = native_config();
        config.heif.converters = vec![converter.to_string_lossy().into_owned()];
        let generator = DerivativeGenerator::from_config(config).await;
        assert!(generator.converter().is_some());

        let result = tokio::time::timeout(
            Duration::from_millis(1500),
            generator.run(input.path(), output.path(), &RunOptions::default()),
        )
        .await;
        assert!(result.is_err(), "run should still be converting");

        let logged = std::fs::read_to_string(&log).unwrap();
        let scratch = logged.lines().next().unwrap();
        assert!(scratch.contains("plate-heif-"));
        assert!(!Path::new(scratch).exists());
    }
}

/// A stand-in `ffmpeg` that writes a placeholder to its last argument, fails
/// with a message for `bad.jpg` and fails silently for `silent.jpg`.
#[cfg(unix)]
mod with_ffmpeg {
    use super::*;
    use plate_core::config::FailurePolicy;
    use std::os::unix::fs::PermissionsExt;

    const STUB: &str = "#!/bin/sh\n\
        [ \"$1\" = \"-version\" ] && exit 0\n\
        src=\"\"\n\
        prev=\"\"\n\
        for arg; do\n\
            [ \"$prev\" = \"-i\" ] && src=\"$arg\"\n\
            prev=\"$arg\"\n\
        done\n\
        case \"$src\" in\n\
            *bad.jpg) echo \"Invalid data found when processing input\" >&2; exit 1 ;;\n\
            *silent.jpg) exit 3 ;;\n\
        esac\n\
        printf webp > \"$prev\"\n";

    fn ffmpeg_config(tools: &Path) -> Config {
        let program = tools.join("ffmpeg");
        std::fs::write(&program, STUB).unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = native_config();
        config.encoder.backend = EncoderBackend::Ffmpeg;
        config.encoder.program = program.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn ffmpeg_writes_six_derivatives() {
        let tools = tempfile::tempdir().unwrap();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("00361.jpg"), b"jpeg").unwrap();

        let generator = DerivativeGenerator::from_config(ffmpeg_config(tools.path())).await;
        let summary = generator
            .run(input.path(), output.path(), &RunOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.backend, "ffmpeg");
        assert_eq!(summary.generated, 1);
        assert_eq!(list_files(output.path()).len(), 6);
        assert!(output.path().join("thumbs/00361-thumb-96.webp").is_file());
        assert!(output.path().join("00361-primary-2400.webp").is_file());
    }

    #[tokio::test]
    async fn ffmpeg_failure_carries_stderr() {
        let tools = tempfile::tempdir().unwrap();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("bad.jpg"), b"jpeg").unwrap();

        let generator = DerivativeGenerator::from_config(ffmpeg_config(tools.path())).await;
        let err = generator
            .run(input.path(), output.path(), &RunOptions::default())
            .await
            .unwrap_err();

        match err {
            PipelineError::Encode { path, message, .. } => {
                assert!(path.ends_with("bad.jpg"));
                assert_eq!(message, "Invalid data found when processing input");
            }
            other => panic!("expected encode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn ffmpeg_silent_failure_reports_exit_status() {
        let tools = tempfile::tempdir().unwrap();
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("ok.jpg"), b"jpeg").unwrap();
        std::fs::write(input.path().join("silent.jpg"), b"jpeg").unwrap();

        let mut config = ffmpeg_config(tools.path());
        config.processing.on_error = FailurePolicy::Continue;
        let generator = DerivativeGenerator::from_config(config).await;
        let summary = generator
            .run(input.path(), output.path(), &RunOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.generated, 1);
        assert_eq!(summary.failed, 1);
        let failed = summary
            .files
            .iter()
            .find(|f| f.source.ends_with("silent.jpg"))
            .unwrap();
        match &failed.outcome {
            FileOutcome::Failed { error } => {
                assert!(error.contains("exited with exit status: 3"), "{error}");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
