use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, Field, InputMode, Phase, StatusLevel, TransferStatus};
use crate::domain::transaction::truncate_middle;

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size(), app.recovery_open);

    draw_header(f, areas.header, app);
    if let Some(area) = areas.recovery {
        draw_recovery_input(f, area, app);
    }
    draw_account_panel(f, areas.account, app);
    draw_transfer_panel(f, areas.transfer, app);
    draw_history_table(f, areas.history, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            "Pocket",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Chain", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ({})  ", app.chain.name, app.chain.chain_id)),
        Span::styled("RPC", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", app.rpc_endpoint)),
    ]);

    let header = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(header, area);
}

fn draw_recovery_input(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.input_mode == InputMode::Editing(Field::SeedPhrase);
    let paragraph = Paragraph::new(field_line(app, Field::SeedPhrase, editing))
        .block(
            Block::default()
                .title("Recover: seed phrase or private key (Enter to recover, Esc to close)")
                .borders(Borders::ALL)
                .border_style(border_style(editing)),
        );
    f.render_widget(paragraph, area);
}

fn draw_account_panel(f: &mut Frame, area: Rect, app: &App) {
    let lines = match app.account.as_ref() {
        None => vec![
            Line::from(Span::styled(
                "No account created yet",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                key_span("n"),
                Span::raw(" create a new account   "),
                key_span("i"),
                Span::raw(" recover from a seed phrase"),
            ]),
        ],
        Some(account) => {
            let seed = if app.seed_phrase.is_empty() {
                Span::styled("No seed phrase available", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(app.seed_phrase.clone(), Style::default().fg(Color::Yellow))
            };
            vec![
                Line::from(vec![label_span("Address  "), Span::raw(account.address.clone())]),
                Line::from(vec![
                    label_span("Explorer "),
                    Span::styled(
                        app.chain.address_url(&account.address),
                        Style::default().fg(Color::Blue),
                    ),
                ]),
                Line::from(vec![
                    label_span("Balance  "),
                    Span::styled(
                        balance_text(&account.balance, &app.chain.symbol),
                        Style::default()
                            .fg(Color::LightGreen)
                            .add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![label_span("Index    "), Span::raw(app.account_index.to_string())]),
                Line::from(""),
                Line::from(label_span("Seed phrase")),
                Line::from(seed),
            ]
        }
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Account").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_transfer_panel(f: &mut Frame, area: Rect, app: &App) {
    let editing = matches!(
        app.input_mode,
        InputMode::Editing(Field::Destination | Field::Amount)
    );

    let send_style = if app.can_send() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::LightGreen)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![
        Line::from(vec![
            label_span("To     "),
            field_span(app, Field::Destination),
        ]),
        Line::from(vec![label_span("Amount "), field_span(app, Field::Amount)]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Send ", send_style),
            Span::styled("  (s)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];
    lines.extend(banner_lines(app));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(format!("Send {}", app.chain.symbol))
                .borders(Borders::ALL)
                .border_style(border_style(editing)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn banner_lines(app: &App) -> Vec<Line<'static>> {
    match &app.transfer {
        TransferStatus::Idle => Vec::new(),
        TransferStatus::Pending => vec![Line::from(Span::styled(
            "Transfer pending…",
            Style::default().fg(Color::LightYellow),
        ))],
        TransferStatus::Complete { url, .. } => vec![
            Line::from(Span::styled(
                "Transfer complete!",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(url.clone(), Style::default().fg(Color::Blue))),
        ],
        TransferStatus::Error { message } => vec![
            Line::from(Span::styled(
                "Transfer failed",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::LightRed))),
        ],
    }
}

fn draw_history_table(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Transactions").borders(Borders::ALL);

    if app.history.is_empty() {
        let text = if app.account.is_none() {
            ""
        } else if app.history_loading {
            "Loading..."
        } else {
            "No transactions found"
        };
        let paragraph = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["No.", "Hash", "From", "To", "Status", "Timestamp"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.history.iter().enumerate().map(|(i, record)| {
        Row::new(vec![
            Cell::from((i + 1).to_string()),
            Cell::from(truncate_middle(&record.hash)),
            Cell::from(truncate_middle(&record.from)),
            Cell::from(truncate_middle(&record.to)),
            Cell::from(record.status_glyph()),
            Cell::from(record.timestamp_display()),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Min(19),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let phase = match app.phase() {
        Phase::NoAccount => "no account",
        Phase::AccountReady => "ready",
        Phase::TransferPending => "pending",
        Phase::TransferComplete => "complete",
        Phase::TransferError => "error",
    };
    let mut spans = vec![
        Span::styled("State ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", phase)),
    ];
    if let Some(account) = app.account.as_ref() {
        spans.push(Span::styled("Account ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!(
            "{}  ",
            crate::app::short_addr(&account.address)
        )));
    }
    if let InputMode::Editing(field) = app.input_mode {
        spans.push(Span::styled("Editing ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(field.title()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("new", "Generate a new account"),
        ("recover", "recover <seed phrase | private key>"),
        ("index", "index <n>: derive another account"),
        ("send", "send <amount> <address>"),
        ("to", "to <address>: set destination"),
        ("amount", "amount <value>: set amount"),
        ("refresh", "Refresh balance and history"),
        ("copy", "copy [address|mnemonic|key|tx]"),
        ("help", "Show key bindings"),
        ("quit", "Exit"),
    ];

    let word = input.split_whitespace().next().unwrap_or("");
    commands
        .iter()
        .find(|(cmd, _)| cmd.starts_with(word))
        .map(|(_, desc)| *desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint_text = command_hint(&app.command.input).unwrap_or("new | recover | send | copy | help");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.as_str()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Editing(_) => Line::from(Span::styled(
            "Enter=submit  Tab=next field  Esc=done",
            Style::default().fg(Color::DarkGray),
        )),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let mut spans = vec![
        key_span("n"),
        Span::raw(" New  "),
        key_span("i"),
        Span::raw(" Recover  "),
    ];
    if app.account.is_some() {
        spans.extend([
            key_span("d"),
            Span::raw(" To  "),
            key_span("a"),
            Span::raw(" Amount  "),
            key_span("s"),
            Span::raw(" Send  "),
            key_span("r"),
            Span::raw(" Refresh  "),
            key_span("y"),
            Span::raw(" Copy  "),
        ]);
    }
    if app.last_tx_url.is_some() {
        spans.extend([key_span("Y"), Span::raw(" Copy tx  ")]);
    }
    spans.extend([
        key_span(":"),
        Span::raw(" Command  "),
        key_span("?"),
        Span::raw(" Help  "),
        key_span("q"),
        Span::raw(" Quit"),
    ]);
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Account"),
        Line::from("  n          Create a new account"),
        Line::from("  i          Recover from seed phrase / private key"),
        Line::from("  y          Copy address"),
        Line::from(""),
        Line::from("Transfer"),
        Line::from("  d          Edit destination"),
        Line::from("  a          Edit amount"),
        Line::from("  s          Send"),
        Line::from("  Y          Copy last transaction link"),
        Line::from("  Esc        Dismiss banner / close input"),
        Line::from(""),
        Line::from("Other"),
        Line::from("  r          Refresh balance and history"),
        Line::from("  :          Command palette"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :new  :recover <phrase>  :index <n>"),
        Line::from("  :send <amount> <address>  :to <address>  :amount <value>"),
        Line::from("  :refresh  :copy [address|mnemonic|key|tx]  :quit"),
        Line::from(""),
        Line::from(format!(
            "Chain: {} ({})  derivation m/44'/{}'/0'/0/n",
            app.chain.name, app.chain.chain_id, app.chain.coin_type
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn field_line(app: &App, field: Field, editing: bool) -> Line<'static> {
    let mut text = app.field_buffer(field).to_string();
    if editing {
        text.push('▏');
    }
    Line::from(text)
}

fn field_span(app: &App, field: Field) -> Span<'static> {
    let editing = app.input_mode == InputMode::Editing(field);
    let mut text = app.field_buffer(field).to_string();
    if editing {
        text.push('▏');
    }
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else if text.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    if text.is_empty() {
        return Span::styled("--", style);
    }
    Span::styled(text, style)
}

fn balance_text(balance: &str, symbol: &str) -> String {
    if balance.parse::<f64>().is_ok() {
        format!("{balance} {symbol}")
    } else {
        balance.to_string()
    }
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(key, Style::default().fg(Color::LightCyan))
}

fn label_span(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::DarkGray))
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
