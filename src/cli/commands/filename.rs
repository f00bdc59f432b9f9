//! Filename command implementation
//!
//! Prints the RINEX output file name a conversion run would produce for a
//! given day, without touching any input data. Useful for scripting around
//! the daily upload.

use crate::app::services::rinex::{rinex_file_name, RinexVariant};
use crate::cli::args::FilenameArgs;
use crate::{Error, Result};

pub fn run_filename(args: FilenameArgs) -> Result<()> {
    let date = args.parse_date()?;
    let variant = RinexVariant::from_token(&args.rinex_type);
    if variant == RinexVariant::Unknown {
        return Err(Error::configuration(format!(
            "unknown rinex type '{}' (expected VERSION2, VERSION3, BIPM or CCTF)",
            args.rinex_type
        )));
    }

    println!("{}", rinex_file_name(date, variant));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_is_rejected() {
        let args = FilenameArgs {
            date: "20210501".to_string(),
            rinex_type: "RINEX9".to_string(),
        };
        assert!(run_filename(args).is_err());
    }

    #[test]
    fn test_pre_epoch_date_is_rejected() {
        let args = FilenameArgs {
            date: "18590101".to_string(),
            rinex_type: "CCTF".to_string(),
        };
        assert!(run_filename(args).is_err());
    }

    #[test]
    fn test_known_type_succeeds() {
        let args = FilenameArgs {
            date: "20210501".to_string(),
            rinex_type: "cctf".to_string(),
        };
        assert!(run_filename(args).is_ok());
    }
}
