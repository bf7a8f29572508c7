use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use crate::models::Account;
use crate::ui::styles;
use crate::utils::{format_cents, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_account_list(frame, app, chunks[0]);
    render_account_detail(frame, app, chunks[1]);
}

fn render_account_list(frame: &mut Frame, app: &App, area: Rect) {
    let accounts = app.sorted_accounts();

    let items: Vec<ListItem> = accounts
        .iter()
        .map(|account| {
            let balance = account
                .balance_cents()
                .map(format_cents)
                .unwrap_or_else(|| account.balance.clone());
            let line = Line::from(vec![
                Span::styled(format!("{:>5}  ", account.id), styles::dim_style()),
                Span::styled(
                    format!("{:<24}", truncate_string(&account.owner, 24)),
                    styles::text_style(),
                ),
                Span::styled(format!("{:>12} ", balance), styles::value_style()),
                Span::styled(account.currency.clone(), styles::dim_style()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let title = format!(
        " Accounts ({}) [o]wner [b]alance [i]d ",
        accounts.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::pane_style(app.focus == Focus::List));

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !accounts.is_empty() {
        state.select(Some(app.account_selection.min(accounts.len() - 1)));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_account_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(styles::pane_style(app.focus == Focus::Detail));

    let Some(account) = app.selected_account() else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " No account selected",
                styles::dim_style(),
            )))
            .block(block),
            area,
        );
        return;
    };

    let mut lines = header_lines(account);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Recent transactions",
        styles::header_style(),
    )));

    let history = app.selected_account_transactions();
    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            "   none on record",
            styles::dim_style(),
        )));
    }
    for tx in history.iter().take(area.height.saturating_sub(8) as usize) {
        let outgoing = tx.from_account_id == account.id;
        let amount = tx
            .amount_cents()
            .map(format_cents)
            .unwrap_or_else(|| tx.amount.clone());
        let sign = if outgoing { "-" } else { "+" };
        let counterparty = if outgoing {
            tx.to_account_id
        } else {
            tx.from_account_id
        };
        lines.push(Line::from(vec![
            Span::styled(format!("   #{:<6}", tx.id), styles::dim_style()),
            Span::styled(
                format!("{}{:>10}  ", sign, amount),
                styles::amount_style(outgoing),
            ),
            Span::styled(
                format!("acct {:<6} ", counterparty),
                styles::text_style(),
            ),
            Span::styled(tx.status.to_string(), styles::dim_style()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn header_lines(account: &Account) -> Vec<Line<'static>> {
    let balance = account
        .balance_cents()
        .map(format_cents)
        .unwrap_or_else(|| account.balance.clone());
    vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" Owner:    "),
            Span::styled(account.owner.clone(), styles::text_style()),
        ]),
        Line::from(vec![
            Span::raw(" Account:  "),
            Span::styled(format!("#{}", account.id), styles::text_style()),
        ]),
        Line::from(vec![
            Span::raw(" Balance:  "),
            Span::styled(
                format!("{} {}", balance, account.currency),
                styles::value_style(),
            ),
        ]),
    ]
}
