// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe").required(true).help("Path to the recipe file")
}

/// Common arguments: profile file and overrides
fn profile_args() -> [Arg; 4] {
    [
        Arg::new("profile")
            .short('p')
            .long("profile")
            .help("Profile file (TOML with [settings], [options] and [conf] tables)"),
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(clap::ArgAction::Append)
            .help("Setting override, e.g. os=Linux"),
        Arg::new("option")
            .short('o')
            .long("option")
            .value_name("KEY=VALUE")
            .action(clap::ArgAction::Append)
            .help("Option override, e.g. shared=True"),
        Arg::new("conf")
            .short('c')
            .long("conf")
            .value_name("KEY=VALUE")
            .action(clap::ArgAction::Append)
            .help("Configuration knob, e.g. tools.build:skip_test=True"),
    ]
}

/// Common argument: workspace root
fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .default_value(".")
        .help("Workspace root holding the sources")
}

fn build_cli() -> Command {
    Command::new("skillet")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Skillet Contributors")
        .about("Cook native C++ libraries from build recipes")
        .subcommand_required(false)
        .subcommand(
            Command::new("create")
                .about("Cook a recipe: validate, generate, build, test and package")
                .arg(recipe_arg())
                .args(profile_args())
                .arg(root_arg())
                .arg(Arg::new("deps").long("deps").help("Dependency cache directory"))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel build jobs"),
                )
                .arg(
                    Arg::new("no_source")
                        .long("no-source")
                        .action(clap::ArgAction::SetTrue)
                        .help("Never clone the recipe's source repository"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a recipe file, and optionally a profile against it")
                .arg(recipe_arg())
                .args(profile_args()),
        )
        .subcommand(
            Command::new("requirements")
                .about("Show the resolved requirement set for a profile")
                .arg(recipe_arg())
                .args(profile_args()),
        )
        .subcommand(
            Command::new("layout")
                .about("Show the folder layout and final options for a profile")
                .arg(recipe_arg())
                .args(profile_args())
                .arg(root_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell", "elvish"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("skillet.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
