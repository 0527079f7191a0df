//! Asset generation pipeline.
//!
//! A run is planned into at most six independent [`Task`]s, one per
//! platform/asset-kind pair, and all of them run at the same time:
//!
//! ```text
//! RunConfig ──plan──► [iOS icons, Android icons, Android notification icons,
//!                      iOS splash, Android splash, Store listing]
//!                          │ one worker thread each
//!                          ▼
//!                table rows → resolve → write image
//!                          │ (+ Contents.json, resource XML, descriptor patches)
//!                          ▼
//!                join all ──► RunSummary | PipelineError::Tasks
//! ```
//!
//! ## Eligibility
//!
//! A task runs when its platform is selected and its source image exists.
//! The store listing task needs `store` plus at least one producible
//! sub-artifact (Play Store icon, App Store icon, feature graphic).
//!
//! ## Failure model
//!
//! Tasks never cancel each other. The run waits for every task (up to the
//! per-task timeout, measured from launch) and then reports all failures at
//! once. Files written by successful tasks stay on disk; nothing is rolled
//! back.

use crate::config::RunConfig;
use crate::imaging::{
    BackendError, ImageBackend, RustBackend, SampledColor, resolve, sample_background_color,
    write_asset,
};
use crate::render::{
    self, CatalogKind, PatchOutcome, RenderError, Template, TextPatch,
    launch_image_setting_patch, launch_storyboard_removal_patch,
};
use crate::tables::{
    self, APP_ICON_SET_DIR, DestinationContext, INFO_PLIST_PATH, LAUNCH_IMAGE_DIR, PBXPROJ_PATH,
    SpecRow, filter_orientation,
};
use crate::types::{AssetKind, AssetRequest, Platform};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Why a single task failed.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{slot}: {source}")]
    ImageProcessing {
        slot: &'static str,
        source: BackendError,
    },
    #[error("timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
    #[error("could not sample the splash background color: {0}")]
    ColorSample(#[source] BackendError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("task panicked before reporting a result")]
    Panicked,
}

/// A failed task together with its cause.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: Task,
    pub error: TaskError,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.task, self.error)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Could not start worker threads: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("{} asset generation task(s) failed", .0.len())]
    Tasks(Vec<TaskFailure>),
}

// =============================================================================
// Tasks
// =============================================================================

/// One independent unit of work producing one platform/kind's artifact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    IosIcons,
    AndroidIcons,
    AndroidNotificationIcons,
    IosSplash,
    AndroidSplash,
    StoreListing,
}

impl Task {
    /// Every task, in the order a run plans them.
    pub const ALL: [Task; 6] = [
        Task::IosIcons,
        Task::AndroidIcons,
        Task::AndroidNotificationIcons,
        Task::IosSplash,
        Task::AndroidSplash,
        Task::StoreListing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Task::IosIcons => "iOS icons",
            Task::AndroidIcons => "Android icons",
            Task::AndroidNotificationIcons => "Android notification icons",
            Task::IosSplash => "iOS splash",
            Task::AndroidSplash => "Android splash",
            Task::StoreListing => "Store listing",
        }
    }

    /// `None` for the store listing, which spans both platforms.
    pub fn platform(self) -> Option<Platform> {
        match self {
            Task::IosIcons | Task::IosSplash => Some(Platform::Ios),
            Task::AndroidIcons | Task::AndroidNotificationIcons | Task::AndroidSplash => {
                Some(Platform::Android)
            }
            Task::StoreListing => None,
        }
    }

    /// The kind of artifact this task produces.
    pub fn kind(self) -> AssetKind {
        match self {
            Task::IosIcons | Task::AndroidIcons => AssetKind::Icon,
            Task::AndroidNotificationIcons => AssetKind::NotificationIcon,
            Task::IosSplash | Task::AndroidSplash => AssetKind::Splash,
            Task::StoreListing => AssetKind::StoreListing,
        }
    }

    /// The source images this task would process under `config`.
    ///
    /// Empty means the task is not eligible. Store listing requests carry
    /// the kind of their *source* (icon or splash) and `store: true`.
    pub fn requests(self, config: &RunConfig) -> Vec<AssetRequest> {
        let request = |platform: Platform, kind: AssetKind, store: bool| {
            if !config.platforms.includes(platform) {
                return None;
            }
            config.assets.get(kind).map(|source| AssetRequest {
                source: source.to_path_buf(),
                kind,
                platform,
                store,
                orientation: config.orientation,
            })
        };

        match self.platform() {
            Some(platform) => request(platform, self.kind(), false).into_iter().collect(),
            None => {
                if !config.store {
                    return Vec::new();
                }
                let mut requests = Vec::new();
                for platform in [Platform::Ios, Platform::Android] {
                    let store_rows = tables::rows(platform, AssetKind::StoreListing);
                    for source_kind in [AssetKind::Icon, AssetKind::Splash] {
                        if !store_rows.iter().any(|row| row.source == source_kind) {
                            continue;
                        }
                        if let Some(req) = request(platform, source_kind, true) {
                            requests.push(req);
                        }
                    }
                }
                requests
            }
        }
    }

    /// Every file a run of this task writes or patches, images first.
    pub fn destinations(self, config: &RunConfig) -> Vec<PathBuf> {
        let ctx = config.destination_context();
        let requests = self.requests(config);
        let mut paths: Vec<PathBuf> = requests
            .iter()
            .flat_map(|request| self.rows(request))
            .map(|row| ctx.path(row.destination))
            .collect();
        if !requests.is_empty() {
            paths.extend(self.text_outputs(&ctx));
        }
        paths
    }

    /// Table rows this task renders for one request.
    fn rows(self, request: &AssetRequest) -> Vec<&'static SpecRow> {
        let table = tables::rows(request.platform, self.kind());
        match self {
            Task::StoreListing => table
                .iter()
                .filter(|row| row.source == request.kind)
                .collect(),
            _ => filter_orientation(table, request.orientation).collect(),
        }
    }

    fn text_outputs(self, ctx: &DestinationContext) -> Vec<PathBuf> {
        match self {
            Task::IosIcons => vec![ctx.path(APP_ICON_SET_DIR).join("Contents.json")],
            Task::IosSplash => vec![
                ctx.path(LAUNCH_IMAGE_DIR).join("Contents.json"),
                ctx.project_path(PBXPROJ_PATH),
                ctx.project_path(INFO_PLIST_PATH),
            ],
            Task::AndroidSplash => ANDROID_SPLASH_TEMPLATES
                .iter()
                .map(|template| ctx.path(template.destination()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const ANDROID_SPLASH_TEMPLATES: [Template; 3] = [
    Template::AndroidColors,
    Template::AndroidLaunchScreenBitmap,
    Template::AndroidStyles,
];

/// The eligible tasks for a run, in fixed order.
pub fn plan(config: &RunConfig) -> Vec<Task> {
    Task::ALL
        .into_iter()
        .filter(|task| !task.requests(config).is_empty())
        .collect()
}

// =============================================================================
// Reports
// =============================================================================

/// One descriptor patch and what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub description: &'static str,
    pub outcome: PatchOutcome,
}

/// What a successful task wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub task: Task,
    pub images: Vec<PathBuf>,
    /// Rendered templates and asset-catalog manifests.
    pub documents: Vec<PathBuf>,
    pub patches: Vec<PatchReport>,
    /// Set by the Android splash task.
    pub background_color: Option<SampledColor>,
}

impl TaskReport {
    fn new(task: Task) -> Self {
        Self {
            task,
            images: Vec::new(),
            documents: Vec::new(),
            patches: Vec::new(),
            background_color: None,
        }
    }
}

/// Result of a run in which every task succeeded.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per task, in plan order.
    pub reports: Vec<TaskReport>,
}

impl RunSummary {
    pub fn image_count(&self) -> usize {
        self.reports.iter().map(|r| r.images.len()).sum()
    }

    pub fn report(&self, task: Task) -> Option<&TaskReport> {
        self.reports.iter().find(|r| r.task == task)
    }
}

// =============================================================================
// Running
// =============================================================================

/// Run every eligible task with the production image backend.
pub fn run(config: RunConfig) -> Result<RunSummary, PipelineError> {
    run_with_backend(Arc::new(config), Arc::new(RustBackend::new()))
}

/// Run every eligible task concurrently and wait for all of them.
///
/// Each task gets its own worker thread so none queues behind another. A
/// task that has not reported by `config.task_timeout` after launch is
/// recorded as [`TaskError::Timeout`] and left to finish on its own.
pub fn run_with_backend<B: ImageBackend + 'static>(
    config: Arc<RunConfig>,
    backend: Arc<B>,
) -> Result<RunSummary, PipelineError> {
    let tasks = plan(&config);
    if tasks.is_empty() {
        tracing::warn!("Nothing to generate: no platform has a usable source image");
        return Ok(RunSummary::default());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(tasks.len())
        .thread_name(|index| format!("asset-task-{index}"))
        .build()?;

    let (tx, rx) = mpsc::channel();
    let launched = Instant::now();
    for (index, task) in tasks.iter().copied().enumerate() {
        let tx = tx.clone();
        let config = Arc::clone(&config);
        let backend = Arc::clone(&backend);
        pool.spawn(move || {
            tracing::info!(task = %task, "started");
            let result = catch_unwind(AssertUnwindSafe(|| {
                run_task(task, &config, backend.as_ref())
            }))
            .unwrap_or(Err(TaskError::Panicked));
            // The receiver is gone once the run has timed out.
            let _ = tx.send((index, result));
        });
    }
    drop(tx);

    let deadline = launched + config.task_timeout;
    let mut results: Vec<Option<Result<TaskReport, TaskError>>> =
        tasks.iter().map(|_| None).collect();
    let mut pending = tasks.len();
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((index, result)) => {
                results[index] = Some(result);
                pending -= 1;
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let mut summary = RunSummary::default();
    let mut failures = Vec::new();
    for (task, result) in tasks.into_iter().zip(results) {
        match result.unwrap_or(Err(TaskError::Timeout(config.task_timeout))) {
            Ok(report) => {
                tracing::info!(
                    task = %task,
                    images = report.images.len(),
                    documents = report.documents.len(),
                    "finished"
                );
                summary.reports.push(report);
            }
            Err(error) => {
                tracing::error!(task = %task, "{error}");
                failures.push(TaskFailure { task, error });
            }
        }
    }

    if failures.is_empty() {
        Ok(summary)
    } else {
        Err(PipelineError::Tasks(failures))
    }
}

fn run_task(
    task: Task,
    config: &RunConfig,
    backend: &impl ImageBackend,
) -> Result<TaskReport, TaskError> {
    let ctx = config.destination_context();
    let mut report = TaskReport::new(task);

    for request in task.requests(config) {
        let rows = task.rows(&request);

        if task == Task::AndroidSplash {
            // colors.xml needs the sampled color, so sampling comes first.
            let color = sample_background_color(backend, &request.source)
                .map_err(TaskError::ColorSample)?;
            tracing::debug!(color = %color.hex, "sampled splash background");
            render_android_resources(&color, &ctx, &mut report)?;
            report.background_color = Some(color);
        }

        write_images(backend, &request.source, &rows, &ctx, &mut report)?;

        match task {
            Task::IosIcons => {
                let dir = ctx.path(APP_ICON_SET_DIR);
                let path = render::write_catalog_contents(&dir, CatalogKind::AppIcon, rows)?;
                report.documents.push(path);
            }
            Task::IosSplash => {
                let dir = ctx.path(LAUNCH_IMAGE_DIR);
                let path = render::write_catalog_contents(&dir, CatalogKind::LaunchImage, rows)?;
                report.documents.push(path);
                apply_patch(
                    &ctx.project_path(PBXPROJ_PATH),
                    &launch_image_setting_patch(),
                    &mut report,
                )?;
                apply_patch(
                    &ctx.project_path(INFO_PLIST_PATH),
                    &launch_storyboard_removal_patch(),
                    &mut report,
                )?;
            }
            _ => {}
        }
    }

    Ok(report)
}

fn write_images(
    backend: &impl ImageBackend,
    source: &Path,
    rows: &[&'static SpecRow],
    ctx: &DestinationContext,
    report: &mut TaskReport,
) -> Result<(), TaskError> {
    for row in rows {
        let image_error = |err| TaskError::ImageProcessing {
            slot: row.slot_name,
            source: err,
        };
        let asset = resolve(backend, source, row, ctx).map_err(image_error)?;
        write_asset(backend, &asset).map_err(image_error)?;
        tracing::debug!(path = %asset.destination.display(), "wrote");
        report.images.push(asset.destination);
    }
    Ok(())
}

fn render_android_resources(
    color: &SampledColor,
    ctx: &DestinationContext,
    report: &mut TaskReport,
) -> Result<(), TaskError> {
    let vars = [("splash_background_color", color.hex.as_str())];
    for template in ANDROID_SPLASH_TEMPLATES {
        let destination = ctx.path(template.destination());
        render::render_template(template, &destination, &vars)?;
        tracing::debug!(path = %destination.display(), "rendered");
        report.documents.push(destination);
    }
    Ok(())
}

fn apply_patch(path: &Path, patch: &TextPatch, report: &mut TaskReport) -> Result<(), TaskError> {
    let outcome = render::patch_file(path, patch)?;
    match outcome {
        PatchOutcome::Applied(count) => {
            tracing::debug!(path = %path.display(), count, "{}", patch.description)
        }
        PatchOutcome::AlreadyApplied => {
            tracing::debug!(path = %path.display(), "{}: already applied", patch.description)
        }
        PatchOutcome::PatternNotFound => tracing::warn!(
            path = %path.display(),
            "{}: nothing to patch, file left unchanged",
            patch.description
        ),
    }
    report.patches.push(PatchReport {
        path: path.to_path_buf(),
        description: patch.description,
        outcome,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunOptions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{CropRegion, Rgb};
    use crate::test_helpers::*;
    use crate::types::Orientation;

    fn splash_backend() -> MockBackend {
        MockBackend::with_dimensions(1000, 1000).with_pixel(Rgb(255, 0, 0))
    }

    fn run_mock(
        config: RunConfig,
        backend: MockBackend,
    ) -> (Result<RunSummary, PipelineError>, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let result = run_with_backend(Arc::new(config), Arc::clone(&backend));
        (result, backend)
    }

    fn failures(result: Result<RunSummary, PipelineError>) -> Vec<TaskFailure> {
        match result {
            Err(PipelineError::Tasks(failures)) => failures,
            other => panic!("expected task failures, got {other:?}"),
        }
    }

    // =========================================================================
    // Planning
    // =========================================================================

    #[test]
    fn plan_default_platforms_in_fixed_order() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            splash: Some(project.touch("splash.png")),
            ..project.options()
        });

        assert_eq!(
            plan(&config),
            vec![
                Task::IosIcons,
                Task::AndroidIcons,
                Task::IosSplash,
                Task::AndroidSplash
            ]
        );
    }

    #[test]
    fn plan_android_flag_selects_only_android() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            android: true,
            ..project.options()
        });
        assert_eq!(plan(&config), vec![Task::AndroidIcons]);
    }

    #[test]
    fn plan_notification_icon_needs_android() {
        let project = FakeProject::new("Acme");
        let notification = project.touch("bell.png");

        let android = project.config(&RunOptions {
            notification_icon: Some(notification.clone()),
            ..project.options()
        });
        assert_eq!(plan(&android), vec![Task::AndroidNotificationIcons]);

        let ios_only = project.config(&RunOptions {
            notification_icon: Some(notification),
            ios: true,
            ..project.options()
        });
        assert!(plan(&ios_only).is_empty());
    }

    #[test]
    fn plan_skips_missing_assets() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            splash: Some(project.path("missing.png")),
            ..project.options()
        });
        assert_eq!(plan(&config), vec![Task::IosIcons, Task::AndroidIcons]);
        assert_eq!(config.notices.len(), 1);
    }

    #[test]
    fn store_listing_needs_flag_and_a_source() {
        let project = FakeProject::new("Acme");
        let icon = project.touch("icon.png");

        let without_flag = project.config(&RunOptions {
            icon: Some(icon.clone()),
            ..project.options()
        });
        assert!(!plan(&without_flag).contains(&Task::StoreListing));

        let nothing_to_list = project.config(&RunOptions {
            store: true,
            ..project.options()
        });
        assert!(plan(&nothing_to_list).is_empty());

        let with_flag = project.config(&RunOptions {
            icon: Some(icon),
            store: true,
            ..project.options()
        });
        let requests = Task::StoreListing.requests(&with_flag);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.kind == AssetKind::Icon && r.store));
    }

    #[test]
    fn destinations_list_images_then_text_outputs() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            ..project.options()
        });
        let paths = Task::IosIcons.destinations(&config);

        assert_eq!(paths.len(), 10);
        assert!(paths[0].ends_with("ios/Acme/Images.xcassets/AppIcon.appiconset/Icon-20@2x.png"));
        assert!(paths[9].ends_with("AppIcon.appiconset/Contents.json"));
        assert!(Task::IosSplash.destinations(&config).is_empty());
    }

    // =========================================================================
    // Running
    // =========================================================================

    #[test]
    fn empty_plan_is_not_an_error() {
        let project = FakeProject::new("Acme");
        let config = project.config(&project.options());
        let (result, backend) = run_mock(config, MockBackend::new());

        assert!(result.unwrap().reports.is_empty());
        assert!(backend.get_operations().is_empty());
        assert_eq!(
            relative_files(project.root()),
            vec![
                "ios/Acme.xcodeproj/project.pbxproj",
                "ios/Acme/Info.plist",
                "package.json"
            ]
        );
    }

    #[test]
    fn android_icons_only_run() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            android: true,
            ..project.options()
        });
        let (result, backend) = run_mock(config, MockBackend::new());
        let summary = result.unwrap();

        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.image_count(), 10);
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 10);
        assert!(ops.iter().all(|op| matches!(op, RecordedOp::Resize { crop: None, .. })));
        assert!(backend
            .outputs()
            .iter()
            .any(|o| o.ends_with("android/app/src/main/res/mipmap-xxxhdpi/ic_launcher_round.png")));
        assert!(!project.path("ios/Acme/Images.xcassets").exists());
    }

    #[test]
    fn ios_icons_write_catalog_manifest() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            ios: true,
            ios_asset_name: Some("AppIconBeta".into()),
            ..project.options()
        });
        let (result, _) = run_mock(config, MockBackend::new());
        let report = result.unwrap().reports.remove(0);

        assert_eq!(report.images.len(), 9);
        let manifest = project.read("ios/Acme/Images.xcassets/AppIconBeta.appiconset/Contents.json");
        assert!(manifest.contains("\"Icon-60@3x.png\""));
        assert!(manifest.contains("\"ios-marketing\""));
    }

    #[test]
    fn android_splash_samples_before_rendering_and_resizing() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            android: true,
            ..project.options()
        });
        let (result, backend) = run_mock(config, splash_backend());
        let summary = result.unwrap();

        let report = summary.report(Task::AndroidSplash).unwrap();
        assert_eq!(report.background_color.as_ref().unwrap().hex, "#ff0000");
        assert_eq!(report.images.len(), 10);
        assert_eq!(report.documents.len(), 3);

        assert!(matches!(
            backend.get_operations().first(),
            Some(RecordedOp::Sample { x: 1, y: 1, .. })
        ));
        let colors = project.read("android/app/src/main/res/values/colors.xml");
        assert!(colors.contains("#ff0000"));
        assert!(project
            .path("android/app/src/main/res/drawable/launch_screen_bitmap.xml")
            .is_file());
        assert!(project.path("android/app/src/main/res/values/styles.xml").is_file());
    }

    #[test]
    fn orientation_filters_splash_rows() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            orientation: Some("landscape".into()),
            ..project.options()
        });
        let (result, backend) = run_mock(config, splash_backend());
        let summary = result.unwrap();

        assert_eq!(summary.report(Task::AndroidSplash).unwrap().images.len(), 5);
        assert_eq!(summary.report(Task::IosSplash).unwrap().images.len(), 4);
        assert!(backend
            .outputs()
            .iter()
            .filter(|o| o.contains("android"))
            .all(|o| o.contains("drawable-land-")));
    }

    #[test]
    fn ios_splash_patches_descriptors_once() {
        let project = FakeProject::new("Acme");
        let splash = project.touch("splash.png");
        let options = RunOptions {
            splash: Some(splash),
            ios: true,
            ..project.options()
        };

        let (first, _) = run_mock(project.config(&options), splash_backend());
        let report = first.unwrap().reports.remove(0);
        assert_eq!(report.images.len(), 11);
        assert_eq!(report.patches[0].outcome, PatchOutcome::Applied(2));
        assert_eq!(report.patches[1].outcome, PatchOutcome::Applied(1));

        let pbxproj = "ios/Acme.xcodeproj/project.pbxproj";
        let after_first = project.read(pbxproj);
        assert_eq!(count_in(&project, pbxproj, "ASSETCATALOG_COMPILER_LAUNCHIMAGE_NAME"), 2);
        assert_eq!(count_in(&project, "ios/Acme/Info.plist", "UILaunchStoryboardName"), 0);

        let (second, _) = run_mock(project.config(&options), splash_backend());
        let report = second.unwrap().reports.remove(0);
        assert!(report
            .patches
            .iter()
            .all(|p| p.outcome == PatchOutcome::AlreadyApplied));
        assert_eq!(project.read(pbxproj), after_first);

        let manifest = project.read("ios/Acme/Images.xcassets/LaunchImage.launchimage/Contents.json");
        assert!(manifest.contains("\"full-screen\""));
    }

    #[test]
    fn separate_output_root_still_patches_project_descriptors() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            ios: true,
            assets_output_path: Some("generated".into()),
            ..RunOptions::default()
        });
        let output_root = project.path("generated");
        assert_eq!(config.output_root, output_root);

        let destinations = Task::IosSplash.destinations(&config);
        let pbxproj = project.path("ios/Acme.xcodeproj/project.pbxproj");
        let plist = project.path("ios/Acme/Info.plist");
        assert!(destinations.contains(&pbxproj));
        assert!(destinations.contains(&plist));

        let (result, _) = run_mock(config, splash_backend());
        let report = result.unwrap().reports.remove(0);
        assert_eq!(report.patches[0].path, pbxproj);
        assert_eq!(report.patches[0].outcome, PatchOutcome::Applied(2));
        assert_eq!(report.patches[1].path, plist);
        assert!(report.images.iter().all(|p| p.starts_with(&output_root)));
        assert_eq!(
            report.documents,
            vec![output_root.join("ios/Acme/Images.xcassets/LaunchImage.launchimage/Contents.json")]
        );
        assert!(!output_root.join("ios/Acme.xcodeproj").exists());
        assert_eq!(count_in(&project, "ios/Acme/Info.plist", "UILaunchStoryboardName"), 0);
    }

    #[test]
    fn pbxproj_without_icon_setting_is_only_a_warning() {
        let project = FakeProject::new("Acme");
        project.write("ios/Acme.xcodeproj/project.pbxproj", "// empty project\n");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            ios: true,
            ..project.options()
        });
        let (result, _) = run_mock(config, splash_backend());
        let report = result.unwrap().reports.remove(0);
        assert_eq!(report.patches[0].outcome, PatchOutcome::PatternNotFound);
    }

    #[test]
    fn missing_descriptor_fails_only_ios_splash() {
        let project = FakeProject::new("Acme");
        std::fs::remove_file(project.path("ios/Acme/Info.plist")).unwrap();
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            splash: Some(project.touch("splash.png")),
            ..project.options()
        });
        let (result, _) = run_mock(config, splash_backend());
        let failures = failures(result);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].task, Task::IosSplash);
        assert!(matches!(
            failures[0].error,
            TaskError::Render(RenderError::Io { .. })
        ));
        assert!(project.path("android/app/src/main/res/values/colors.xml").is_file());
    }

    #[test]
    fn every_failure_is_collected() {
        let project = FakeProject::new("Acme");
        let icon = project.touch("icon.png");
        let config = project.config(&RunOptions {
            icon: Some(icon.clone()),
            splash: Some(project.touch("splash.png")),
            ..project.options()
        });
        let (result, _) = run_mock(config, splash_backend().failing_on(&icon));
        let failures = failures(result);

        let failed: Vec<_> = failures.iter().map(|f| f.task).collect();
        assert_eq!(failed, vec![Task::IosIcons, Task::AndroidIcons]);
        assert!(matches!(
            failures[0].error,
            TaskError::ImageProcessing { slot: "iphone-20@2x", .. }
        ));
        // Splash tasks finished and kept their output
        assert!(project.path("android/app/src/main/res/values/colors.xml").is_file());
    }

    #[test]
    fn color_sample_failure_is_strict() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            android: true,
            ..project.options()
        });
        let (result, backend) = run_mock(config, MockBackend::with_dimensions(1000, 1000));
        let failures = failures(result);

        assert!(matches!(failures[0].error, TaskError::ColorSample(_)));
        assert!(backend.outputs().is_empty());
        assert!(!project.path("android/app/src/main/res/values/colors.xml").exists());
    }

    #[test]
    fn slow_task_times_out() {
        let project = FakeProject::new("Acme");
        let mut config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            android: true,
            ..project.options()
        });
        config.task_timeout = Duration::from_millis(50);
        let backend = MockBackend::new().with_resize_delay(Duration::from_millis(200));

        let started = Instant::now();
        let (result, _) = run_mock(config, backend);
        let failures = failures(result);

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].error, TaskError::Timeout(_)));
    }

    #[test]
    fn store_listing_crops_feature_graphic() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            icon: Some(project.touch("icon.png")),
            splash: Some(project.touch("splash.png")),
            store: true,
            ..project.options()
        });
        let (result, backend) = run_mock(config, splash_backend());
        let summary = result.unwrap();

        let store = summary.report(Task::StoreListing).unwrap();
        assert_eq!(store.images.len(), 3);
        assert!(store.images.iter().any(|p| p.ends_with("ios/store/app_store_icon.png")));
        assert!(store.images.iter().any(|p| p.ends_with("android/store/play_store_icon.png")));

        let feature = backend
            .get_operations()
            .into_iter()
            .find(|op| matches!(op, RecordedOp::Resize { output, .. } if output.ends_with("feature_graphic.png")))
            .unwrap();
        assert!(matches!(
            feature,
            RecordedOp::Resize {
                width: 1024,
                height: 500,
                crop: Some(CropRegion { x: 0, y: 256, width: 1000, height: 488 }),
                ..
            }
        ));
    }

    #[test]
    fn report_paths_match_planned_destinations() {
        let project = FakeProject::new("Acme");
        let config = project.config(&RunOptions {
            splash: Some(project.touch("splash.png")),
            android: true,
            orientation: Some(Orientation::Portrait.to_string()),
            ..project.options()
        });
        let planned = Task::AndroidSplash.destinations(&config);
        let (result, _) = run_mock(config, splash_backend());
        let report = result.unwrap().reports.remove(0);

        let mut written = report.images.clone();
        written.extend(report.documents.clone());
        assert_eq!(written, planned);
    }
}
