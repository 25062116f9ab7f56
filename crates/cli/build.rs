use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("linkpeek")
        .version(env!("CARGO_PKG_VERSION"))
        .author("linkpeek Contributors")
        .about("Build rich link previews from web pages")
        .arg(clap::arg!(<URL> "Page URL to preview"))
        .arg(
            clap::arg!(-s --strategy <STRATEGY> "Extraction strategy (standard, wechat)")
                .default_value("standard")
                .value_parser([
                    "standard",
                    "standard-meta-tags",
                    "meta",
                    "0",
                    "wechat",
                    "wechat-mp",
                    "weixin",
                    "1",
                ]),
        )
        .arg(clap::arg!(-l --locale <LOCALE> "Locale sent as Accept-Language (default: en-US)"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, toml, text)")
                .value_name("FORMAT")
                .default_value("json")
                .value_parser(["json", "toml", "text"]),
        )
        .arg(clap::arg!(--pretty "Pretty-print JSON output"))
        .arg(
            clap::arg!(--html <FILE> "Read the page from a local HTML file, or '-' for stdin")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--image_out <FILE> "Download the preview image to FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "linkpeek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "linkpeek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "linkpeek", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "linkpeek", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
