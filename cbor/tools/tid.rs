/*!
TID commands - generate timestamp identifiers, or decode one
*/

use clap::Subcommand;
use grove_tid::Clock;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate TIDs for the current time
    Now {
        /// Clock identifier, 0-1023
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u16).range(0..1024))]
        clock_id: u16,

        /// How many TIDs to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Decode a TID into its timestamp and clock identifier
    Parse {
        /// TID text, 13 characters
        tid: String,
    },
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        match self {
            Command::Now { clock_id, count } => {
                let clock = Clock::new(clock_id);
                for _ in 0..count {
                    println!("{}", clock.now());
                }
            }
            Command::Parse { tid } => {
                let (micros, clock_id) = grove_tid::parse(&tid)
                    .map_err(|e| anyhow::anyhow!("Invalid TID {tid:?}: {e}"))?;
                println!("timestamp: {micros}");
                match time::OffsetDateTime::from_unix_timestamp_nanos(micros as i128 * 1_000) {
                    Ok(t) => println!("time:      {t}"),
                    Err(e) => tracing::warn!("Timestamp {micros} is out of range: {e}"),
                }
                println!("clock id:  {clock_id}");
            }
        }
        Ok(())
    }
}
