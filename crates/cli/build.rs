use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("readmode")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render a web page as a distraction-free reading view")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, markdown, text, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "markdown", "text", "json"]),
        )
        .arg(clap::arg!(--url <URL> "Page URL used for site lookup when reading a file or stdin"))
        .arg(
            clap::arg!(--"config-dir" <DIR> "Site config directory")
                .value_name("DIR")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"min-chars" <NUM> "Minimum characters of text a candidate needs").default_value("300"))
        .arg(clap::arg!(--"min-words" <NUM> "Minimum words a candidate needs").default_value("50"))
        .arg(clap::arg!(--fragment "Emit only the cleaned content (HTML only)"))
        .arg(clap::arg!(--frontmatter "Include TOML frontmatter (Markdown only)"))
        .arg(clap::arg!(--references "Include reference table with all links (Markdown/JSON only)"))
        .arg(clap::arg!(--"no-images" "Strip images from output (Markdown only)"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "readmode", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "readmode", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
