//! Summary command - totals, maxima and net income

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tally_core::{AccountId, MaxIncomeAndExpense, NetIncome, Summary, Totals};

use super::{finish, get_context};
use crate::output::{self, format_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryView {
    All,
    Totals,
    Max,
    Net,
}

#[derive(Serialize)]
#[serde(untagged)]
enum SummaryData {
    All(Summary),
    Totals(Totals),
    Max(MaxIncomeAndExpense),
    Net(NetIncome),
}

pub fn run(account: AccountId, view: SummaryView, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let aggregation = &ctx.aggregation_service;

    let result = match view {
        SummaryView::All => aggregation.summary(account).map(SummaryData::All),
        SummaryView::Totals => aggregation.totals(account).map(SummaryData::Totals),
        SummaryView::Max => aggregation
            .max_income_and_expense(account)
            .map(SummaryData::Max),
        SummaryView::Net => aggregation
            .net_income(account)
            .map(|net_income| SummaryData::Net(NetIncome { net_income })),
    };

    finish(ctx, "summary", None, result, json, |data| {
        let mut table = output::create_table();
        match data {
            SummaryData::All(s) => {
                table.add_row(vec!["Income entries".to_string(), s.income_count.to_string()]);
                table.add_row(vec!["Expense entries".to_string(), s.expense_count.to_string()]);
                table.add_row(vec!["Total income".to_string(), format_amount(s.total_income)]);
                table.add_row(vec!["Total expenses".to_string(), format_amount(s.total_expense)]);
                table.add_row(vec!["Largest income".to_string(), format_amount(s.max_income)]);
                table.add_row(vec!["Largest expense".to_string(), format_amount(s.max_expense)]);
            }
            SummaryData::Totals(t) => {
                table.add_row(vec!["Total income".to_string(), format_amount(t.total_income)]);
                table.add_row(vec!["Total expenses".to_string(), format_amount(t.total_expense)]);
            }
            SummaryData::Max(m) => {
                table.add_row(vec!["Largest income".to_string(), format_amount(m.max_income)]);
                table.add_row(vec!["Largest expense".to_string(), format_amount(m.max_expense)]);
            }
            SummaryData::Net(_) => {}
        }

        println!("{}", "Summary".bold());
        if !matches!(data, SummaryData::Net(_)) {
            println!("{}", table);
        }

        let net = match data {
            SummaryData::All(s) => Some(s.net_income),
            SummaryData::Net(n) => Some(n.net_income),
            _ => None,
        };
        if let Some(net) = net {
            let text = format!("Net income: {}", format_amount(net));
            if net.is_sign_negative() {
                println!("{}", text.red().bold());
            } else {
                println!("{}", text.green().bold());
            }
        }
    })
}
