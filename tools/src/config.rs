use std::path::PathBuf;
use pico_args::Arguments;

#[derive(Debug, Clone)]
pub struct Config {
    pub filename: PathBuf,
    pub timestamps: bool,
    pub utc: bool,
    pub page_size: Option<usize>,
    pub head: usize,
    pub tail: usize,
    pub settings: Option<PathBuf>,
}


const HELP: &str = "\
logview

Replay a log file as a paged log stream and print the resulting document.

USAGE:
  logview [OPTIONS] <INPUT>

FLAGS:
  -h, --help            Prints help information
  -t, --timestamps      Prefix each record with its timestamp
      --utc             Show timestamps in UTC instead of local time

OPTIONS:
  -n, --page-size N     Records per page
      --head N          Fetch N pages of older records
      --tail N          Fetch N pages of newer records
      --settings FILE   Read TOML settings from FILE

ARGS:
  <INPUT>               Log file to replay
";

impl Config {
    fn new() -> Self {
        Config {
            filename: PathBuf::new(),
            timestamps: false,
            utc: false,
            page_size: None,
            head: 0,
            tail: 0,
            settings: None,
        }
    }

    pub fn from_env() -> Result<Config, pico_args::Error> {
        let mut pargs = pico_args::Arguments::from_env();

        if pargs.contains(["-h", "--help"]) {
            print!("{}", HELP);
            std::process::exit(0);
        }

        let mut cfg = Config::new();
        cfg.parse_args(pargs)?;
        Ok(cfg)
    }

    fn parse_args(&mut self, mut pargs: Arguments) -> Result<(), pico_args::Error> {
        if pargs.contains(["-t", "--timestamps"]) { self.timestamps = true; }
        if pargs.contains("--utc") { self.utc = true; }
        self.page_size = pargs.opt_value_from_str(["-n", "--page-size"])?;
        self.head = pargs.opt_value_from_str("--head")?.unwrap_or(0);
        self.tail = pargs.opt_value_from_str("--tail")?.unwrap_or(0);
        self.settings = pargs.opt_value_from_str::<_, String>("--settings")?.map(PathBuf::from);

        // Exactly one input file remains
        let mut inputs = Vec::new();
        for ostr in pargs.finish() {
            if let Some(s) = ostr.to_str() {
                if s.as_bytes().first() == Some(&b'-') {
                    eprintln!("Error: Unknown argument: {:?}", ostr);
                    std::process::exit(1);
                }
            }
            inputs.push(PathBuf::from(ostr));
        }
        match inputs.len() {
            1 => {
                self.filename = inputs.remove(0);
                Ok(())
            }
            0 => Err(pico_args::Error::MissingArgument),
            _ => {
                eprintln!("Error: Expected one input file, got {}", inputs.len());
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Config, pico_args::Error> {
        let args: Vec<OsString> = args.iter().map(OsString::from).collect();
        let mut cfg = Config::new();
        cfg.parse_args(Arguments::from_vec(args))?;
        Ok(cfg)
    }

    #[test]
    fn defaults() {
        let cfg = parse(&["app.log"]).unwrap();
        assert_eq!(cfg.filename, PathBuf::from("app.log"));
        assert!(!cfg.timestamps);
        assert!(!cfg.utc);
        assert_eq!(cfg.page_size, None);
        assert_eq!((cfg.head, cfg.tail), (0, 0));
        assert_eq!(cfg.settings, None);
    }

    #[test]
    fn all_options() {
        let cfg = parse(&[
            "-t", "--utc", "-n", "5", "--head", "2", "--tail", "3", "--settings", "logview.toml", "app.log",
        ])
        .unwrap();
        assert!(cfg.timestamps);
        assert!(cfg.utc);
        assert_eq!(cfg.page_size, Some(5));
        assert_eq!((cfg.head, cfg.tail), (2, 3));
        assert_eq!(cfg.settings, Some(PathBuf::from("logview.toml")));
    }

    #[test]
    fn missing_input() {
        assert!(matches!(parse(&["-t"]), Err(pico_args::Error::MissingArgument)));
    }

    #[test]
    fn bad_number() {
        assert!(parse(&["--head", "lots", "app.log"]).is_err());
    }
}
