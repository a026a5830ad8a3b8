use std::{env, fs, io, path::PathBuf};

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").ok_or_else(|| io::Error::other("OUT_DIR not set"))?);
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir)?;

    let mut cmd = clap::Command::new("httpedia")
        .version(env!("CARGO_PKG_VERSION"))
        .author("HTTPedia Contributors")
        .about("Render Wikipedia articles as HTML 2.0 for vintage browsers")
        .arg(clap::arg!(<INPUT> "Wikipedia article URL, local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--title <TITLE> "Article title (default: taken from the URL or file name)"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "json"]),
        )
        .arg(
            clap::arg!(--skin <SKIN> "Display skin (standard, plain)")
                .default_value("standard")
                .value_parser(["standard", "plain"]),
        )
        .arg(
            clap::arg!(--images <MODE> "Image mode (none, first, all)")
                .default_value("first")
                .value_parser(["none", "first", "all"]),
        )
        .arg(clap::arg!(--"max-images" <NUM> "Maximum number of images kept in \"all\" mode").default_value("10"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("10"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Print progress and render details to stderr"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "httpedia", &completions_dir)?;
    }

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
    Ok(())
}
