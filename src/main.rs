use clap::{Parser, Subcommand};
use mobile_assets::config::{self, RunConfig, RunOptions};
use mobile_assets::pipeline::{self, PipelineError};
use mobile_assets::{logging, output};
use std::path::PathBuf;

/// Source images and output options shared by `generate` and `plan`.
///
/// Relative paths are resolved against `--project-dir`.
#[derive(clap::Args, Clone)]
struct AssetArgs {
    /// Square source image for app icons, relative to --project-dir (1024x1024 or larger recommended)
    #[arg(long)]
    icon: Option<PathBuf>,

    /// Source image for splash screens, relative to --project-dir (2732x2732 or larger recommended)
    #[arg(long)]
    splash: Option<PathBuf>,

    /// Source image for Android notification icons, relative to --project-dir
    #[arg(long)]
    android_notification_icon: Option<PathBuf>,

    /// Generate Android assets only (combine with --ios for both)
    #[arg(long)]
    android: bool,

    /// Generate iOS assets only (combine with --android for both)
    #[arg(long)]
    ios: bool,

    /// Also generate Play Store / App Store listing images
    #[arg(long)]
    store: bool,

    /// Project name; read from package.json when omitted
    #[arg(long)]
    project_name: Option<String>,

    /// Root generated ios/ and android/ files are written under, relative to --project-dir [default: .]
    #[arg(long)]
    assets_output_path: Option<PathBuf>,

    /// Android source set under android/app/src/ [default: main]
    #[arg(long)]
    android_src_directory: Option<String>,

    /// Name of the iOS app icon set [default: AppIcon]
    #[arg(long)]
    ios_asset_name: Option<String>,

    /// Splash orientations: portrait, landscape or all [default: all]
    #[arg(long)]
    orientation: Option<String>,

    /// Include portrait splash screens
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    portrait: bool,

    /// Include landscape splash screens
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    landscape: bool,

    /// Seconds a single generation task may run [default: 300]
    #[arg(long, value_name = "SECS")]
    task_timeout: Option<u64>,
}

impl AssetArgs {
    fn into_options(self) -> RunOptions {
        RunOptions {
            icon: self.icon,
            splash: self.splash,
            notification_icon: self.android_notification_icon,
            android: self.android,
            ios: self.ios,
            store: self.store,
            project_name: self.project_name,
            assets_output_path: self.assets_output_path,
            android_src_directory: self.android_src_directory,
            ios_asset_name: self.ios_asset_name,
            orientation: self.orientation,
            portrait: self.portrait,
            landscape: self.landscape,
            task_timeout_secs: self.task_timeout,
        }
    }
}

#[derive(Parser)]
#[command(name = "mobile-assets")]
#[command(about = "Generate Android and iOS icons and splash screens")]
#[command(long_about = "\
Generate Android and iOS icons and splash screens

Run inside a React Native project. One icon and one splash image become every
density bucket and asset-catalog slot both platforms expect:

  android/app/src/main/res/
  ├── mipmap-<density>/ic_launcher.png         # --icon
  ├── mipmap-<density>/ic_launcher_round.png   # --icon
  ├── drawable-<density>/ic_notification.png   # --android-notification-icon
  ├── drawable[-land]-<density>/launch_screen.png  # --splash
  ├── drawable/launch_screen_bitmap.xml
  └── values/colors.xml, styles.xml            # background sampled from splash
  ios/<project>/Images.xcassets/
  ├── AppIcon.appiconset/                      # --icon, with Contents.json
  └── LaunchImage.launchimage/                 # --splash, with Contents.json

With --splash, project.pbxproj is pointed at the launch images and the
LaunchScreen storyboard entry is removed from Info.plist. Re-running is safe.

Settings can also live in mobile-assets.toml in the project directory.
Run 'mobile-assets gen-config' to generate a documented one.")]
#[command(version)]
struct Cli {
    /// React Native project directory
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Log every written file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate all assets
    Generate(AssetArgs),
    /// List the files a generate run would write, without writing anything
    Plan(AssetArgs),
    /// Print a stock mobile-assets.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            logging::init(cli.verbose);
            let config = RunConfig::load(&cli.project_dir, &args.into_options())?;
            let output_root = config.output_root.clone();
            match pipeline::run(config) {
                Ok(summary) => output::print_report(&summary, &output_root),
                Err(PipelineError::Tasks(failures)) => {
                    output::print_failures(&failures);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Plan(args) => {
            logging::init(cli.verbose);
            let config = RunConfig::load(&cli.project_dir, &args.into_options())?;
            output::print_plan(&config, &pipeline::plan(&config));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
