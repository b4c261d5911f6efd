//! Command tests that run against a temporary data directory.

use clap::Parser;
use lotledger::cmd::{check, report_cmd};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    fs::write(
        path.join("stock_trades.csv"),
        "id,ticker,side,date,price,quantity\n\
         o1,AAPL,buy,2020-01-01,10,10\n\
         o2,AAPL,buy,2020-01-02,20,10\n\
         o3,AAPL,sell,2020-01-03,30,15\n\
         o4,MSFT,buy,2020-02-03,180.5,2\n",
    )
    .unwrap();
    fs::write(
        path.join("option_instruments.csv"),
        "instrument,ticker,expiration_date,option_type,strike_price\n\
         2cf55d12,OKTA,2020-12-18,call,250\n",
    )
    .unwrap();
    fs::write(
        path.join("option_trades.csv"),
        "strategy_id,strategy_type,instrument,side,date,price,quantity\n\
         s1,long_call,https://api.broker.com/options/instruments/2cf55d12/,buy,2020-11-02,2,1\n\
         s2,long_call,https://api.broker.com/options/instruments/2cf55d12/,sell,2020-11-30,5,1\n",
    )
    .unwrap();
    fs::write(
        path.join("transfers.csv"),
        "id,direction,state,amount,date\n\
         t1,deposit,completed,1000,2019-12-30\n\
         t2,withdraw,completed,250.25,2020-06-01\n\
         t3,deposit,pending,99,2020-06-02\n",
    )
    .unwrap();

    dir
}

fn report(args: &[&str]) -> anyhow::Result<String> {
    let args = report_cmd::Args::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    report_cmd::run(&args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn data_arg(dir: &Path) -> String {
    dir.display().to_string()
}

#[test]
fn test_gains_text() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&[
        "lotledger-report", "--data", &data, "gains", "--from", "2020-01-01", "--to", "2020-12-31",
    ])
    .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("Name"));
    assert!(lines[0].ends_with("Earnings"));
    assert!(lines[2].starts_with("AAPL "));
    assert!(lines[2].ends_with("200.00"));
    assert!(lines[3].ends_with("50.00"));
    assert!(lines[4].starts_with("OKTA201218C00250000"));
    assert!(lines[4].ends_with("300.00"));
    assert_eq!(lines.last(), Some(&"Total earnings: 550.00"));
}

#[test]
fn test_gains_csv_with_ticker() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&[
        "lotledger-report", "--data", &data, "gains", "--from", "2020-01-01", "--to", "2020-12-31",
        "--ticker", "OKTA", "--format", "csv",
    ])
    .unwrap();

    assert_eq!(
        out,
        "Name,Date Bought,Price Bought,Date Sold,Price Sold,Quantity,Earnings\n\
         OKTA201218C00250000,2020-11-02,2.00,2020-11-30,5.00,1,300.00\n"
    );
}

#[test]
fn test_gains_json() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&[
        "lotledger-report", "--data", &data, "gains", "--from", "2020-06-01", "--to", "2020-12-31",
        "-f", "json",
    ])
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["rows"].as_array().unwrap().len(), 1);
    assert_eq!(value["rows"][0]["Name"], "OKTA201218C00250000");
    assert_eq!(value["rows"][0]["Quantity"], 1);
    let total: Decimal = value["total"].as_str().unwrap().parse().unwrap();
    assert_eq!(total, dec!(300));
}

#[test]
fn test_gains_inverted_window() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let err = report(&[
        "lotledger-report", "--data", &data, "gains", "--from", "2021-01-01", "--to", "2020-01-01",
    ])
    .unwrap_err();
    assert!(err.to_string().starts_with("report window starts on 2021-01-01"));
}

#[test]
fn test_holdings_csv() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&[
        "lotledger-report", "--data", &data, "holdings", "--as-of", "2020-12-31", "--format", "csv",
    ])
    .unwrap();

    assert_eq!(
        out,
        "Name,Lots,Quantity,Average Cost,Cost Basis,First Acquired\n\
         AAPL,1,5,20.00,100.00,2020-01-02\n\
         MSFT,1,2,180.50,361.00,2020-02-03\n"
    );
}

#[test]
fn test_holdings_before_sell() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&[
        "lotledger-report", "--data", &data, "holdings", "--as-of", "2020-01-02",
    ])
    .unwrap();

    assert!(out.starts_with("Holdings as of 2020-01-02\n"));
    let aapl = out.lines().find(|line| line.starts_with("AAPL")).unwrap();
    assert!(aapl.contains("300.00"));
    assert!(!out.contains("MSFT"));
}

#[test]
fn test_deposits() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let out = report(&["lotledger-report", "--data", &data, "deposits", "--as-of", "2020-12-31"]).unwrap();
    assert_eq!(out, "Net deposits as of 2020-12-31: 749.75\n");
}

#[test]
fn test_missing_data_dir() {
    let err = report(&[
        "lotledger-report", "--data", "/definitely/not/here", "deposits",
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "data directory not found: /definitely/not/here");
}

#[test]
fn test_oversell_fails_report() {
    let dir = data_dir();
    fs::write(
        dir.path().join("stock_trades.csv"),
        "id,ticker,side,date,price,quantity\n\
         o1,AAPL,buy,2020-01-01,10,10\n\
         o2,AAPL,sell,2020-01-03,30,11\n",
    )
    .unwrap();
    let data = data_arg(dir.path());

    let err = report(&[
        "lotledger-report", "--data", &data, "gains", "--from", "2020-01-01", "--to", "2020-12-31",
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "cannot sell 11 AAPL: only 10 held");
}

#[test]
fn test_check_summary() {
    let dir = data_dir();
    let data = data_arg(dir.path());
    let args = check::Args::try_parse_from(["lotledger-check", "--data", &data, "--write-cache"]).unwrap();

    let mut out = Vec::new();
    check::run(&args, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Wrote 1 contracts to the instrument cache"));
    assert!(out.contains("Loaded 4 stock trades, 2 option trades, 0 splits, 3 transfers"));
    assert!(out.contains("Replayed 6 events: 3 realized sales, 2 open instruments"));
    assert!(dir.path().join("instruments_cache.json").exists());
}

#[test]
fn test_check_quiet_reports_errors() {
    let dir = data_dir();
    fs::write(
        dir.path().join("splits.csv"),
        "ticker,date,from_amount,to_amount\nAAPL,2020-08-31,4,1\n",
    )
    .unwrap();
    let data = data_arg(dir.path());
    let args = check::Args::try_parse_from(["lotledger-check", "--data", &data, "-q"]).unwrap();

    let mut out = Vec::new();
    let err = check::run(&args, &mut out).unwrap_err();
    assert!(out.is_empty());
    assert_eq!(
        format!("{err:#}"),
        "replay failed: unsupported 4-to-1 split of AAPL: only forward splits are handled"
    );
}
