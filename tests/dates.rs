#[path = "common/mod.rs"]
mod common;

use common::*;
use threadsplit::{age_in_days, classify_age, parse_created_at, Bucket, DayWindow};

#[test]
fn parses_zero_padded_created_at() {
    let ts = parse_created_at(ANCHOR).expect("anchor parses");
    assert_eq!(ts.year(), 2023);
    assert_eq!(u8::from(ts.month()), 12);
    assert_eq!(ts.day(), 20);
    assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 35, 9));
    assert_eq!(ts.offset().whole_hours(), 8);
}

#[test]
fn parses_unpadded_and_space_padded_days() {
    let unpadded = parse_created_at("Tue Mar 5 08:00:00 +0000 2024").expect("unpadded day");
    let spaced = parse_created_at("Tue Mar  5 08:00:00 +0000 2024").expect("space-padded day");
    let padded = parse_created_at("Tue Mar 05 08:00:00 +0000 2024").expect("zero-padded day");
    assert_eq!(unpadded, padded);
    assert_eq!(spaced, padded);
}

#[test]
fn collapses_stray_whitespace_as_last_resort() {
    let messy = parse_created_at("Wed  Dec   20 10:35:09  +0800 2023").expect("collapsed retry");
    assert_eq!(messy, parse_created_at(ANCHOR).unwrap());
}

#[test]
fn weekday_name_is_not_checked_against_the_date() {
    // Dec 20 2023 is a Wednesday; the date fields decide.
    let mismatched = parse_created_at("Mon Dec 20 10:35:09 +0800 2023").expect("parses despite weekday");
    assert_eq!(mismatched, parse_created_at(ANCHOR).unwrap());
}

#[test]
fn rejects_other_formats() {
    assert!(parse_created_at("").is_none());
    assert!(parse_created_at("2023-12-20T10:35:09+08:00").is_none());
    assert!(parse_created_at("yesterday").is_none());
    assert!(parse_created_at("Wed Dec 20 10:35:09 2023").is_none(), "offset is required");
}

#[test]
fn offsets_are_respected_when_comparing() {
    // Same instant expressed in two offsets.
    let cst = parse_created_at("Wed Dec 20 10:35:09 +0800 2023").unwrap();
    let utc = parse_created_at("Wed Dec 20 02:35:09 +0000 2023").unwrap();
    assert_eq!(cst, utc);
    assert_eq!(age_in_days(cst, utc), 0.0);
}

#[test]
fn age_is_fractional_days_before_the_anchor() {
    let latest = parse_created_at(ANCHOR).unwrap();
    let week = parse_created_at(days_ago(7)).unwrap();
    assert_eq!(age_in_days(latest, week), 7.0);

    let one_second_short = parse_created_at("Wed Dec 13 10:35:10 +0800 2023").unwrap();
    let age = age_in_days(latest, one_second_short);
    assert!(age < 7.0 && age > 6.99, "age was {age}");

    // Later than the anchor reads as negative.
    assert!(age_in_days(week, latest) < 0.0);
}

#[test]
fn windows_are_half_open_and_eval_wins_overlaps() {
    let eval = DayWindow::new(0.0, 7.0);
    let train = DayWindow::new(7.0, 30.0);

    assert_eq!(classify_age(0.0, &eval, &train), Bucket::Eval);
    assert_eq!(classify_age(6.999, &eval, &train), Bucket::Eval);
    assert_eq!(classify_age(7.0, &eval, &train), Bucket::Train);
    assert_eq!(classify_age(29.999, &eval, &train), Bucket::Train);
    assert_eq!(classify_age(30.0, &eval, &train), Bucket::Discard);
    assert_eq!(classify_age(-0.5, &eval, &train), Bucket::Discard);

    // Overlapping windows: the evaluation window is checked first.
    let wide_train = DayWindow::new(0.0, 30.0);
    assert_eq!(classify_age(3.0, &eval, &wide_train), Bucket::Eval);
    assert_eq!(classify_age(10.0, &eval, &wide_train), Bucket::Train);
}
