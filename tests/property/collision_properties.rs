//! Property-based tests for collision construction and card rendering

use evgen::cards::{LaunchCard, ProcessCard};
use evgen::collision::CollisionSpec;
use evgen::error::CollisionError;
use proptest::prelude::*;

fn particle() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,3}[+~-]?"
}

fn final_state() -> impl Strategy<Value = String> {
    "[a-z0-9+~ ,()>-]{0,40}"
}

/// Two-token initial states always build, and the process expression is the
/// exact concatenation of both parts.
#[test]
fn test_process_expression_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(particle(), particle(), final_state()),
            |(a, b, fs)| {
                let initial = format!("{} {}", a, b);
                let spec = CollisionSpec::new(initial.clone(), fs.clone()).unwrap();
                prop_assert_eq!(spec.process_expression(), format!("{} > {}", initial, fs));
                prop_assert_eq!(spec.initial_tokens(), (a.as_str(), b.as_str()));
                Ok(())
            },
        )
        .unwrap();
}

/// Any other token count is rejected with the count that was seen.
#[test]
fn test_token_count_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(particle(), 0..6), |tokens| {
            let initial = tokens.join(" ");
            let result = CollisionSpec::new(initial, "t t~");
            if tokens.len() == 2 {
                prop_assert!(result.is_ok());
            } else {
                let CollisionError::InvalidInitialState { count, .. } = result.unwrap_err();
                prop_assert_eq!(count, tokens.len());
            }
            Ok(())
        })
        .unwrap();
}

/// Beam parameters return exactly the supplied values, plus PDF codes only
/// when requested.
#[test]
fn test_beam_parameters_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let value = "[0-9.-]{1,8}";

    runner
        .run(
            &(particle(), particle(), value, value, value, value, any::<bool>()),
            |(a, b, e1, e2, p1, p2, pdf)| {
                let spec = CollisionSpec::builder(format!("{} {}", a, b), "t t~")
                    .energies(e1.clone(), e2.clone())
                    .polarizations(p1.clone(), p2.clone())
                    .include_pdf_codes(pdf)
                    .build()
                    .unwrap();
                let params = spec.beam_parameters();

                prop_assert_eq!(params.get("ebeam1"), Some(e1.as_str()));
                prop_assert_eq!(params.get("ebeam2"), Some(e2.as_str()));
                prop_assert_eq!(params.get("polbeam1"), Some(p1.as_str()));
                prop_assert_eq!(params.get("polbeam2"), Some(p2.as_str()));
                prop_assert_eq!(params.len(), if pdf { 6 } else { 4 });

                if pdf {
                    let expected = |t: &str| match t {
                        "p" => "1",
                        "p~" => "-1",
                        _ => "0",
                    };
                    prop_assert_eq!(params.get("lpp1"), Some(expected(&a)));
                    prop_assert_eq!(params.get("lpp2"), Some(expected(&b)));
                }
                Ok(())
            },
        )
        .unwrap();
}

/// The process card always carries the generate line and ends with the
/// output directive; the launch card has one `set` line per parameter.
#[test]
fn test_card_structure_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                final_state(),
                "[a-z_]{1,12}",
                any::<bool>(),
                prop::collection::vec(("[a-z_]{1,8}", "[0-9]{1,5}"), 0..6),
            ),
            |(fs, dir, isr, params)| {
                let process = format!("e+ e- > {}", fs);
                let process_card = ProcessCard::new(process.clone(), dir.clone(), isr);
                let card = process_card.render();
                let generate_line = format!("generate {}", process);
                let output_line = process_card.output_line();
                prop_assert!(card.lines().any(|l| l == generate_line));
                prop_assert_eq!(card.lines().last(), Some(output_line.as_str()));

                let mut launch = LaunchCard::new(dir, "run01");
                for (k, v) in &params {
                    launch.parameters.insert(k.as_str(), v.as_str());
                }
                let rendered = launch.render();
                let set_lines = rendered.lines().filter(|l| l.starts_with("set ")).count();
                prop_assert_eq!(set_lines, launch.parameters.len());
                Ok(())
            },
        )
        .unwrap();
}
