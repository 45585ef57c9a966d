//! CSV loader for reference data (symbols and news).
//!
//! Files carry a header row. Symbol files use the columns
//! `symbol,is_nasdaq,is_sp500,is_dow`; news files use
//! `headline,body,link,symbol_id`. Flags accept `1`/`0`, `true`/`false`
//! and `yes`/`no`.

use crate::domain::error::TradesimError;
use crate::domain::flag;
use crate::domain::news::{NewNews, News};
use crate::domain::symbol::{NewSymbol, Symbol};
use crate::ports::data_port::DataPort;
use csv::StringRecord;
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn column<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str, TradesimError> {
    record.get(index).ok_or_else(|| TradesimError::Import {
        line: line_of(record),
        reason: format!("missing {name} column"),
    })
}

fn flag_column(record: &StringRecord, index: usize, name: &str) -> Result<bool, TradesimError> {
    let raw = column(record, index, name)?;
    flag::parse(raw).ok_or_else(|| TradesimError::Import {
        line: line_of(record),
        reason: format!("invalid {name} value: {raw:?}"),
    })
}

fn records<R: Read>(reader: R) -> impl Iterator<Item = Result<StringRecord, TradesimError>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(|result| {
            result.map_err(|e| TradesimError::Import {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                reason: format!("CSV parse error: {e}"),
            })
        })
}

pub fn read_symbols<R: Read>(reader: R) -> Result<Vec<NewSymbol>, TradesimError> {
    records(reader)
        .map(|record| {
            let record = record?;
            let symbol = column(&record, 0, "symbol")?;
            if symbol.is_empty() {
                return Err(TradesimError::Import {
                    line: line_of(&record),
                    reason: "empty symbol".into(),
                });
            }
            Ok(NewSymbol {
                symbol: symbol.to_uppercase(),
                is_nasdaq: flag_column(&record, 1, "is_nasdaq")?,
                is_sp500: flag_column(&record, 2, "is_sp500")?,
                is_dow: flag_column(&record, 3, "is_dow")?,
            })
        })
        .collect()
}

pub fn read_news<R: Read>(reader: R) -> Result<Vec<NewNews>, TradesimError> {
    records(reader)
        .map(|record| {
            let record = record?;
            let raw_symbol_id = column(&record, 3, "symbol_id")?;
            let symbol_id = raw_symbol_id.parse::<i64>().map_err(|e| TradesimError::Import {
                line: line_of(&record),
                reason: format!("invalid symbol_id value {raw_symbol_id:?}: {e}"),
            })?;
            Ok(NewNews {
                headline: column(&record, 0, "headline")?.to_string(),
                body: column(&record, 1, "body")?.to_string(),
                link: column(&record, 2, "link")?.to_string(),
                symbol_id,
            })
        })
        .collect()
}

/// Parse the whole file, then insert it in one transaction. A malformed row
/// or a failed insert leaves the store unchanged.
pub fn import_symbols(store: &dyn DataPort, path: &Path) -> Result<Vec<Symbol>, TradesimError> {
    let rows = read_symbols(File::open(path)?)?;
    let symbols = store.create_symbols(rows)?;
    info!("imported {} symbols from {}", symbols.len(), path.display());
    Ok(symbols)
}

pub fn import_news(store: &dyn DataPort, path: &Path) -> Result<Vec<News>, TradesimError> {
    let rows = read_news(File::open(path)?)?;
    let news = store.create_news_items(rows)?;
    info!("imported {} news items from {}", news.len(), path.display());
    Ok(news)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_symbols_with_mixed_flag_spellings() {
        let data = "symbol,is_nasdaq,is_sp500,is_dow\norcl,1,1,1\nSAN, no , yes ,false\n";
        let symbols = read_symbols(data.as_bytes()).unwrap();
        assert_eq!(
            symbols,
            vec![
                NewSymbol {
                    symbol: "ORCL".into(),
                    is_nasdaq: true,
                    is_sp500: true,
                    is_dow: true,
                },
                NewSymbol {
                    symbol: "SAN".into(),
                    is_nasdaq: false,
                    is_sp500: true,
                    is_dow: false,
                },
            ]
        );
    }

    #[test]
    fn bad_flag_reports_line() {
        let data = "symbol,is_nasdaq,is_sp500,is_dow\nORCL,1,1,1\nSAN,maybe,1,0\n";
        match read_symbols(data.as_bytes()) {
            Err(TradesimError::Import { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("is_nasdaq"), "reason: {reason}");
            }
            other => panic!("expected Import error, got: {other:?}"),
        }
    }

    #[test]
    fn empty_symbol_is_rejected() {
        let data = "symbol,is_nasdaq,is_sp500,is_dow\n,1,1,1\n";
        assert!(matches!(
            read_symbols(data.as_bytes()),
            Err(TradesimError::Import { line: 2, .. })
        ));
    }

    #[test]
    fn reads_news_rows() {
        let data = "headline,body,link,symbol_id\n\
                    \"Oracle, up\",body test 1,www.linkTest.com,1\n\
                    headline test 2,body test 2,www.linkTest.com,2\n";
        let news = read_news(data.as_bytes()).unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].headline, "Oracle, up");
        assert_eq!(news[1].symbol_id, 2);
    }

    #[test]
    fn news_with_non_numeric_symbol_id_fails() {
        let data = "headline,body,link,symbol_id\nh,b,l,ORCL\n";
        assert!(matches!(
            read_news(data.as_bytes()),
            Err(TradesimError::Import { line: 2, .. })
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let data = "headline,body,link,symbol_id\n";
        assert!(read_news(data.as_bytes()).unwrap().is_empty());
    }
}
