use prospect_core::SearchKind;

/// One line of shell input, parsed. Search commands carry the raw query;
/// validation (empty query and so on) stays in the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SearchIndustry {
        query: String,
    },
    SearchProduct {
        query: String,
        industry_filter: String,
    },
    Tab(SearchKind),
    History(SearchKind),
    /// 1-based row number as shown in the history modal.
    Pick(usize),
    CloseHistory,
    Export,
    Help,
    Quit,
}

/// Grammar:
///   industry <query>
///   product <query> [/ <industry filter>]
///   tab industry|product
///   history [industry|product]
///   pick <n>
///   close | export | help | quit
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "industry" => Ok(Command::SearchIndustry {
            query: rest.to_string(),
        }),
        "product" => {
            let (query, filter) = match rest.split_once(" / ") {
                Some((query, filter)) => (query.trim(), filter.trim()),
                None => (rest, ""),
            };
            Ok(Command::SearchProduct {
                query: query.to_string(),
                industry_filter: filter.to_string(),
            })
        }
        "tab" => parse_kind(rest)
            .map(Command::Tab)
            .ok_or_else(|| "usage: tab industry|product".to_string()),
        "history" => {
            if rest.is_empty() {
                Ok(Command::History(SearchKind::Industry))
            } else {
                parse_kind(rest)
                    .map(Command::History)
                    .ok_or_else(|| "usage: history [industry|product]".to_string())
            }
        }
        "pick" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Command::Pick(n)),
            _ => Err("usage: pick <row number>".to_string()),
        },
        "close" => Ok(Command::CloseHistory),
        "export" => Ok(Command::Export),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("empty command; try 'help'".to_string()),
        other => Err(format!("unknown command '{other}'; try 'help'")),
    }
}

fn parse_kind(word: &str) -> Option<SearchKind> {
    match word {
        "industry" => Some(SearchKind::Industry),
        "product" => Some(SearchKind::Product),
        _ => None,
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  industry <query>              search companies by industry
  product <query> [/ <filter>]  search by product, optional industry filter
  tab industry|product          switch the active search tab
  history [industry|product]    open the search history list
  pick <n>                      replay the n-th history row
  close                         close the history list
  export                        export current results to Excel
  help                          show this text
  quit                          exit
";
