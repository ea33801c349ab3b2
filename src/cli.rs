use std::path::{Path, PathBuf};

pub const USAGE: &str = "\
usage: codesplit [--root DIR] <command>

commands:
  split FILE [--max-lines N]   split FILE into <base>_pNN.part files
  combine FILE                 merge the parts of FILE (or of the part FILE) into a new file
  run FILE                     combine, then run the merged file
  view FILE                    print the combined content of FILE's split
  watch FILE                   like view, re-printed whenever a part changes
  list                         show every registered split
  forget FILE                  drop the split record of FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Split {
        file: PathBuf,
        max_lines: Option<usize>,
    },
    Combine {
        file: PathBuf,
    },
    Run {
        file: PathBuf,
    },
    View {
        file: PathBuf,
    },
    Watch {
        file: PathBuf,
    },
    List,
    Forget {
        file: PathBuf,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub command: CliCommand,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut root = None;
    let mut max_lines = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Ok(CliArgs {
                    root,
                    command: CliCommand::Help,
                })
            }
            "--root" => {
                let value = iter.next().ok_or("--root needs a directory")?;
                root = Some(PathBuf::from(value));
            }
            "--max-lines" => {
                let value = iter.next().ok_or("--max-lines needs a number")?;
                let n = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid --max-lines value: {}", value))?;
                max_lines = Some(n);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option: {}", flag)),
            other => positional.push(other),
        }
    }

    let (name, rest) = match positional.split_first() {
        Some((name, rest)) => (*name, rest),
        None => {
            return Ok(CliArgs {
                root,
                command: CliCommand::Help,
            })
        }
    };

    let file = || -> Result<PathBuf, String> {
        match rest {
            [file] => Ok(PathBuf::from(file)),
            [] => Err(format!("{} needs a FILE", name)),
            _ => Err(format!("{} takes a single FILE", name)),
        }
    };

    if max_lines.is_some() && name != "split" {
        return Err("--max-lines only applies to split".to_string());
    }

    let command = match name {
        "split" => CliCommand::Split {
            file: file()?,
            max_lines,
        },
        "combine" => CliCommand::Combine { file: file()? },
        "run" => CliCommand::Run { file: file()? },
        "view" => CliCommand::View { file: file()? },
        "watch" => CliCommand::Watch { file: file()? },
        "forget" => CliCommand::Forget { file: file()? },
        "list" if rest.is_empty() => CliCommand::List,
        "list" => return Err("list takes no arguments".to_string()),
        "help" => CliCommand::Help,
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(CliArgs { root, command })
}

pub fn resolve_root(cwd: &Path, root: Option<&Path>) -> std::io::Result<PathBuf> {
    let root = match root {
        Some(root) => absolute(cwd, root),
        None => cwd.to_path_buf(),
    };
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("workspace root is not a directory: {}", root.display()),
        ));
    }
    Ok(root.canonicalize().unwrap_or(root))
}

/// Absolute, symlink-free when the file exists; metadata keys are compared
/// as plain paths, so every path entering the store goes through here.
pub fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    let raw = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    raw.canonicalize().unwrap_or(raw)
}

#[cfg(test)]
#[path = "../tests/unit/cli.rs"]
mod tests;
