use anyhow::{Context, Result};
use clap::Parser;
use geneflock::highlight::DEFAULT_HIGHLIGHT_COLOR;
use geneflock::{
    load_highlight_ids, ChromosomeFilter, Drawing, Genome, HighlightedGenome, StrandColors,
};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geneflock")]
#[command(
    about = "Read a genome GFF file and produce an SVG file with each chromosome rendered as a line and colored boxes representing the genes.",
    long_about = None
)]
struct Args {
    /// The path to the GFF file.
    #[arg(value_name = "GFF_FILE")]
    gff_file: PathBuf,

    /// The path to the generated SVG file.
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: PathBuf,

    /// The path to a file containing a list of gene IDs to highlight (one per line).
    #[arg(long = "highlight-genes-file", value_name = "FILE")]
    highlight_genes_file: Option<PathBuf>,

    /// Color of forward-strand genes.
    #[arg(long = "forward-color", value_name = "COLOR", default_value = "red")]
    forward_color: String,

    /// Color of reverse-strand genes.
    #[arg(long = "reverse-color", value_name = "COLOR", default_value = "blue")]
    reverse_color: String,

    /// Color of highlighted genes.
    #[arg(long = "highlight-color", value_name = "COLOR", default_value = DEFAULT_HIGHLIGHT_COLOR)]
    highlight_color: String,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    verbose: u8,
}

fn run(args: &Args) -> Result<()> {
    let colors = StrandColors::new(&args.forward_color, &args.reverse_color);
    let genome = Genome::from_path(&args.gff_file, ChromosomeFilter::default(), colors)
        .with_context(|| format!("Error loading GFF file {:?}", args.gff_file))?;

    let drawing: Box<dyn Drawing> = match &args.highlight_genes_file {
        None => Box::new(genome),
        Some(list_file) => {
            let ids = load_highlight_ids(list_file)?;
            Box::new(HighlightedGenome::new(genome, ids, &args.highlight_color))
        }
    };

    info!("Rendering SVG...");
    let svg_content = drawing
        .render()
        .with_context(|| format!("Error rendering {:?}", args.gff_file))?;

    info!("Saving to {:?}...", args.output_file);
    let mut file = File::create(&args.output_file)
        .with_context(|| format!("Error creating file {:?}", args.output_file))?;
    file.write_all(svg_content.as_bytes())
        .with_context(|| format!("Error writing SVG to {:?}", args.output_file))?;
    info!("Wrote {} bytes", svg_content.len());

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    info!("Starting visualization...");

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Done.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    const GFF: &str = "##gff-version 3
##sequence-region chr1 1 200000
chr1\tsrc\tgene\t1000\t2000\t.\t+\t.\tID=gene.1
chr1\tsrc\tgene\t3000\t3500\t.\t-\t.\tID=gene.2
";

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["geneflock", "in.gff3", "out.svg"]);
        assert_eq!(args.gff_file, PathBuf::from("in.gff3"));
        assert_eq!(args.output_file, PathBuf::from("out.svg"));
        assert_eq!(args.forward_color, "red");
        assert_eq!(args.reverse_color, "blue");
        assert_eq!(args.highlight_color, "green");
        assert!(args.highlight_genes_file.is_none());
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_color_options() {
        let args = Args::parse_from([
            "geneflock",
            "in.gff3",
            "out.svg",
            "--forward-color",
            "#ff8800",
            "--reverse-color",
            "teal",
            "--highlight-genes-file",
            "ids.txt",
            "--highlight-color",
            "gold",
            "-v",
            "2",
        ]);
        assert_eq!(args.forward_color, "#ff8800");
        assert_eq!(args.reverse_color, "teal");
        assert_eq!(args.highlight_genes_file, Some(PathBuf::from("ids.txt")));
        assert_eq!(args.highlight_color, "gold");
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_run_writes_svg() {
        let td = tempdir().unwrap();
        let gff = td.path().join("genome.gff3");
        let out = td.path().join("genome.svg");
        fs::write(&gff, GFF).unwrap();

        let args = Args::parse_from([
            OsStr::new("geneflock"),
            gff.as_os_str(),
            out.as_os_str(),
            OsStr::new("--forward-color"),
            OsStr::new("orange"),
        ]);
        run(&args).unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("fill: orange;"));
        assert!(svg.contains(r#"id="gene_1""#));
        assert!(!svg.contains("{ fill: green; }"));
    }

    #[test]
    fn test_run_highlights_listed_genes() {
        let td = tempdir().unwrap();
        let gff = td.path().join("genome.gff3");
        let ids = td.path().join("ids.txt");
        let out = td.path().join("genome.svg");
        fs::write(&gff, GFF).unwrap();
        fs::write(&ids, "gene.2\n").unwrap();

        let args = Args::parse_from([
            OsStr::new("geneflock"),
            gff.as_os_str(),
            out.as_os_str(),
            OsStr::new("--highlight-genes-file"),
            ids.as_os_str(),
            OsStr::new("--highlight-color"),
            OsStr::new("gold"),
        ]);
        run(&args).unwrap();

        let svg = fs::read_to_string(&out).unwrap();
        assert!(svg.contains("#gene_2{ fill: gold; }</style>"));
    }

    #[test]
    fn test_run_fails_without_large_chromosomes() {
        let td = tempdir().unwrap();
        let gff = td.path().join("small.gff3");
        let out = td.path().join("small.svg");
        fs::write(
            &gff,
            "##sequence-region s 1 50000\ns\tsrc\tgene\t1\t100\t.\t+\t.\tID=a\n",
        )
        .unwrap();

        let args = Args::parse_from([OsStr::new("geneflock"), gff.as_os_str(), out.as_os_str()]);
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("no chromosomes met the inclusion criteria"));
        assert!(!out.exists());
    }
}
