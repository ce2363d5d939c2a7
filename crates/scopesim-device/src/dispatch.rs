//! Command-to-response mapping.

use rand::Rng;

use scopesim_proto::{Command, Response, CODE_FAILURE, CODE_SUCCESS};

use crate::fixture::Fixtures;

/// Map one decoded command to its response.
///
/// Stateless across calls: nothing about a prior command influences the
/// next. The match is exhaustive over the closed [`Command`] set; a new
/// variant fails to compile until classified here.
pub fn dispatch<R: Rng>(command: &Command, fixtures: &mut Fixtures<R>) -> Response {
    match command {
        Command::GetDevStatus => Response::DevStatus(fixtures.dev_status()),
        Command::GetProfile => Response::Profile(fixtures.profile()),

        Command::SetZoomLevel { .. }
        | Command::SetColorScheme { .. }
        | Command::SetAirTemp { .. }
        | Command::SetDistance { .. }
        | Command::SetAgcMode { .. }
        | Command::SetAirPressure { .. }
        | Command::SetAirHumidity { .. }
        | Command::SetPowderTemp { .. }
        | Command::SetWind { .. }
        | Command::SetZeroing { .. }
        | Command::SetCompassOffset { .. }
        | Command::ButtonPress { .. }
        | Command::TriggerCmd { .. } => Response::StatusOk { code: CODE_SUCCESS },

        Command::Unknown { .. } => Response::StatusErr { code: CODE_FAILURE },
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn fixtures() -> Fixtures<StdRng> {
        Fixtures::with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn known_set_commands_yield_success() {
        let mut fixtures = fixtures();
        let commands = [
            Command::SetZoomLevel { level: 5 },
            Command::SetColorScheme { scheme: 1 },
            Command::SetAirTemp { temperature: -5 },
            Command::SetDistance { distance: 600 },
            Command::SetAgcMode { mode: 2 },
            Command::SetAirPressure { pressure: 10100 },
            Command::SetAirHumidity { humidity: 65 },
            Command::SetPowderTemp { temperature: 20 },
            Command::SetWind {
                direction: 90,
                speed: 4,
            },
            Command::SetZeroing { x: 0, y: 0 },
            Command::SetCompassOffset { offset: 12 },
            Command::ButtonPress { button: 1 },
            Command::TriggerCmd { cmd: 2 },
        ];
        for command in &commands {
            let response = dispatch(command, &mut fixtures);
            assert_eq!(response, Response::StatusOk { code: CODE_SUCCESS });
        }
    }

    #[test]
    fn unknown_command_yields_error_status() {
        let mut fixtures = fixtures();
        for id in [0u32, 16, 4096, u32::MAX] {
            let response = dispatch(&Command::Unknown { id }, &mut fixtures);
            assert_eq!(response, Response::StatusErr { code: CODE_FAILURE });
        }
    }

    #[test]
    fn status_query_yields_snapshot() {
        let mut fixtures = fixtures();
        let response = dispatch(&Command::GetDevStatus, &mut fixtures);
        assert!(matches!(response, Response::DevStatus(_)));
    }

    #[test]
    fn profile_query_yields_snapshot() {
        let mut fixtures = fixtures();
        let response = dispatch(&Command::GetProfile, &mut fixtures);
        assert!(matches!(response, Response::Profile(_)));
    }

    #[test]
    fn dispatch_total_over_discriminant_sweep() {
        // Every raw discriminant decodes and dispatches to one of the four
        // response variants; none panics or falls through.
        let mut fixtures = fixtures();
        for id in 0..=4096u32 {
            let mut record = id.to_le_bytes().to_vec();
            record.extend_from_slice(&[0; 8]); // enough field bytes for any variant
            let command = Command::decode(&record).unwrap();
            let response = dispatch(&command, &mut fixtures);
            assert!(matches!(
                response,
                Response::StatusOk { .. }
                    | Response::StatusErr { .. }
                    | Response::DevStatus(_)
                    | Response::Profile(_)
            ));
        }
    }

    #[test]
    fn dispatch_is_stateless_across_calls() {
        let mut fixtures = fixtures();
        let command = Command::SetZoomLevel { level: 3 };
        let first = dispatch(&command, &mut fixtures);
        dispatch(&Command::Unknown { id: 999 }, &mut fixtures);
        let second = dispatch(&command, &mut fixtures);
        assert_eq!(first, second);
    }
}
