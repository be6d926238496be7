/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// playfield pixels into terminal cells and state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use nova_descent::entities::{
    AttackMode, HazardKind, Owner, PickupKind, Player, PlayerId, SimulationState,
};
use nova_descent::highscores::Ledger;
use nova_descent::phase::Phase;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER_ONE: Color = Color::White;
const C_PLAYER_TWO: Color = Color::Rgb { r: 255, g: 100, b: 100 };
const C_PLAYER_DEAD: Color = Color::DarkGrey;
const C_SHIELD: Color = Color::Cyan;
const C_HAZARD: Color = Color::Grey;
const C_HAZARD_EVIL: Color = Color::Red;
const C_HAZARD_BONUS: Color = Color::DarkYellow;
const C_ENEMY: Color = Color::Green;
const C_MINION: Color = Color::Magenta;
const C_BOSS: Color = Color::Rgb { r: 150, g: 30, b: 200 };
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Yellow;

// ── Playfield → terminal mapping ──────────────────────────────────────────────

/// Maps the fixed-size playfield onto whatever the terminal currently is.
/// Row 0 is the HUD, row 1 and `rows - 2` are the border, the last row is
/// the hint line.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub field: Vec2,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, field: Vec2) -> Self {
        Self { cols, rows, field }
    }

    fn inner(&self) -> (f32, f32) {
        (
            self.cols.saturating_sub(2).max(1) as f32,
            self.rows.saturating_sub(4).max(1) as f32,
        )
    }

    /// Terminal cell for a playfield point, or `None` if it is off-field.
    pub fn to_cell(&self, pos: Vec2) -> Option<(u16, u16)> {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x >= self.field.x || pos.y >= self.field.y {
            return None;
        }
        let (w, h) = self.inner();
        let col = 1 + (pos.x / self.field.x * w) as u16;
        let row = 2 + (pos.y / self.field.y * h) as u16;
        Some((col, row))
    }

    /// Playfield point under a terminal cell, clamped to the field.
    pub fn to_field(&self, col: u16, row: u16) -> Vec2 {
        let (w, h) = self.inner();
        let x = (col.saturating_sub(1) as f32 + 0.5) / w * self.field.x;
        let y = (row.saturating_sub(2) as f32 + 0.5) / h * self.field.y;
        Vec2::new(x.clamp(0.0, self.field.x), y.clamp(0.0, self.field.y))
    }
}

fn put<W: Write>(out: &mut W, cell: (u16, u16), color: Color, text: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(cell.0, cell.1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Draws `text` centred on the cell for `pos`, if that cell is on screen.
fn put_centred<W: Write>(
    out: &mut W,
    view: &Viewport,
    pos: Vec2,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.to_cell(pos) {
        let half = text.chars().count() as u16 / 2;
        let col = col.saturating_sub(half).max(1);
        put(out, (col, row), color, text)?;
    }
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &SimulationState,
    view: &Viewport,
    status_line: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    for hazard in state.hazards.values() {
        let (glyph, color) = match hazard.kind {
            HazardKind::Default => ("◉", C_HAZARD),
            HazardKind::Evil => ("✹", C_HAZARD_EVIL),
            _ => ("◈", C_HAZARD_BONUS),
        };
        put_centred(out, view, hazard.pos, color, glyph)?;
    }
    for pickup in state.pickups.values() {
        let (glyph, color) = pickup_glyph(pickup.kind);
        put_centred(out, view, pickup.pos, color, glyph)?;
    }
    for enemy in state.enemies.values() {
        let color = if enemy.minion { C_MINION } else { C_ENEMY };
        put_centred(out, view, enemy.pos, color, "«▼»")?;
    }
    if let Some(boss) = &state.boss {
        let face = match boss.mode {
            AttackMode::Normal => "◖◉◉◉◗",
            AttackMode::Spread => "◖<◉>◗",
            AttackMode::Rapid => "◖!!!◗",
        };
        put_centred(out, view, boss.pos - Vec2::new(0.0, 40.0), C_BOSS, "▄███▄")?;
        put_centred(out, view, boss.pos, C_BOSS, face)?;
        put_centred(out, view, boss.pos + Vec2::new(0.0, 40.0), C_BOSS, "▀███▀")?;
    }
    for projectile in state.projectiles.values() {
        let (glyph, color) = match projectile.owner {
            Owner::Player(_) => ("║", C_BULLET_PLAYER),
            Owner::Enemy => ("↓", C_BULLET_ENEMY),
        };
        put_centred(out, view, projectile.pos, color, glyph)?;
    }
    for explosion in state.explosions.values() {
        let glyph = if explosion.frame < 3 { "✺" } else { "·" };
        put_centred(out, view, explosion.pos, C_EXPLOSION, glyph)?;
    }
    for player in &state.players {
        draw_player(out, player, state.clock_ms, view)?;
    }

    draw_controls_hint(out, state, view, status_line)?;
    draw_overlay(out, state, view)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn pickup_glyph(kind: PickupKind) -> (&'static str, Color) {
    match kind {
        PickupKind::Revive => ("✚", Color::Red),
        PickupKind::InvulnerabilityGift => ("■", Color::Blue),
        PickupKind::WeaponUpgrade => ("▲", Color::Yellow),
        PickupKind::ExtraLife => ("♥", Color::Green),
        PickupKind::TeleportCharge => ("◎", Color::Magenta),
        PickupKind::Shield => ("○", Color::Cyan),
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn player_tag(player: &Player, now_ms: u64) -> String {
    let label = match player.id {
        PlayerId::One => "P1",
        PlayerId::Two => "P2",
    };
    let mut tag = format!(
        "{label} {:>5} HP{:>3} {}",
        player.score,
        player.health,
        "♥".repeat(player.lives.min(9) as usize)
    );
    if let Some(upgrade) = player.upgrade.filter(|_| player.is_upgraded(now_ms)) {
        tag.push_str(&format!(" [GUNS {}s]", upgrade.remaining_ms(now_ms).div_ceil(1000)));
    }
    if player.has_shield(now_ms) {
        tag.push_str(" [SHLD]");
    }
    if player.is_invulnerable(now_ms) {
        tag.push_str(" [INVL]");
    }
    if player.teleport_charge {
        tag.push_str(" [TP]");
    }
    tag
}

fn phase_label(phase: Phase) -> (&'static str, Color) {
    match phase {
        Phase::AsteroidField => ("[ ASTEROID FIELD ]", Color::Green),
        Phase::Transition => ("[ INCOMING ]", Color::Yellow),
        Phase::EnemyWaves => ("[ ENEMY WAVES ]", Color::Yellow),
        Phase::BossTransition => ("[ WARNING ]", Color::Red),
        Phase::BossFight => ("[ BOSS ]", Color::Red),
        Phase::Victory => ("[ VICTORY ]", Color::Cyan),
        Phase::Defeat => ("[ DEFEAT ]", Color::DarkGrey),
    }
}

fn draw_hud<W: Write>(out: &mut W, state: &SimulationState, view: &Viewport) -> std::io::Result<()> {
    if let Some(p1) = state.player(PlayerId::One) {
        put(out, (1, 0), C_HUD_SCORE, &player_tag(p1, state.clock_ms))?;
    }

    let (label, color) = phase_label(state.phase.phase);
    let lx = (view.cols / 2).saturating_sub(label.len() as u16 / 2);
    put(out, (lx, 0), color, label)?;

    if let Some(p2) = state.player(PlayerId::Two) {
        let tag = player_tag(p2, state.clock_ms);
        let rx = view.cols.saturating_sub(tag.chars().count() as u16 + 1);
        put(out, (rx, 0), C_HUD_LIVES, &tag)?;
    } else if let Some(boss) = &state.boss {
        let tag = format!("BOSS {:>3}", boss.health);
        let rx = view.cols.saturating_sub(tag.len() as u16 + 1);
        put(out, (rx, 0), C_BOSS, &tag)?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    player: &Player,
    now_ms: u64,
    view: &Viewport,
) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲
    //  /█\
    let color = if !player.alive {
        if player.blink_alpha(now_ms) > 127 {
            C_PLAYER_DEAD
        } else {
            return Ok(());
        }
    } else if player.has_shield(now_ms) {
        C_SHIELD
    } else {
        match player.id {
            PlayerId::One => C_PLAYER_ONE,
            PlayerId::Two => C_PLAYER_TWO,
        }
    };
    put_centred(out, view, player.pos - Vec2::new(0.0, 20.0), color, "▲")?;
    put_centred(out, view, player.pos + Vec2::new(0.0, 15.0), color, "/█\\")?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(
    out: &mut W,
    state: &SimulationState,
    view: &Viewport,
    status_line: Option<&str>,
) -> std::io::Result<()> {
    let hint = match status_line {
        Some(message) => message.to_string(),
        None if state.two_player => {
            "WASD+SPACE / ARROWS+ENTER : Play   T / 0 : Teleport   P : Pause   F/L : Save/Load   Q : Quit"
                .to_string()
        }
        None => "WASD : Move   SPACE : Shoot   T : Teleport   M : Mouse   P : Pause   F/L : Save/Load   +/- : Volume   Q : Quit"
            .to_string(),
    };
    put(out, (1, view.rows.saturating_sub(1)), C_HINT, &hint)
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, view: &Viewport, lines: &[(String, Color)]) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        put(out, (col, start_row + i as u16), *color, msg)?;
    }
    Ok(())
}

fn draw_overlay<W: Write>(out: &mut W, state: &SimulationState, view: &Viewport) -> std::io::Result<()> {
    let score = state.combined_score();
    let lines: Vec<(String, Color)> = if state.phase.paused {
        vec![
            ("╔════════════════════╗".into(), C_BANNER),
            ("║       PAUSED       ║".into(), C_BANNER),
            ("╚════════════════════╝".into(), C_BANNER),
            ("P - Resume  Q - Menu".into(), Color::White),
        ]
    } else {
        match state.phase.phase {
            Phase::Transition => vec![
                ("ASTEROID FIELD CLEARED".into(), C_BANNER),
                ("Enemy fleet incoming...".into(), Color::White),
            ],
            Phase::BossTransition => vec![
                ("ENEMY WAVES DESTROYED".into(), C_BANNER),
                ("Warning: boss approaching".into(), Color::Red),
            ],
            Phase::Victory => vec![
                ("╔════════════════════╗".into(), Color::Cyan),
                ("║      VICTORY!      ║".into(), Color::Cyan),
                ("╚════════════════════╝".into(), Color::Cyan),
                (format!("Final Score: {score:>6}"), C_HUD_SCORE),
                ("R - Menu  Q - Quit".into(), Color::White),
            ],
            Phase::Defeat => vec![
                ("╔════════════════════╗".into(), Color::Red),
                ("║    GAME  OVER      ║".into(), Color::Red),
                ("╚════════════════════╝".into(), Color::Red),
                (format!("Final Score: {score:>6}"), C_HUD_SCORE),
                ("R - Menu  Q - Quit".into(), Color::White),
            ],
            _ => return Ok(()),
        }
    };
    draw_banner(out, view, &lines)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(out: &mut W, ledger: &Ledger, has_save: bool) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  NOVA  DESCENT  ★";
    put(
        out,
        (cx.saturating_sub(title.chars().count() as u16 / 2), cy.saturating_sub(8)),
        Color::Cyan,
        title,
    )?;

    let mut options = vec![
        ("1", "Single player", Color::Green),
        ("2", "Two players  ", Color::Yellow),
    ];
    if has_save {
        options.push(("L", "Load saved game", Color::Cyan));
    }
    options.push(("Q", "Quit", Color::Red));

    for (i, (key, label, color)) in options.iter().enumerate() {
        let row = cy.saturating_sub(6) + i as u16;
        put(out, (cx.saturating_sub(12), row), Color::DarkGrey, &format!("[{key}] "))?;
        put(out, (cx.saturating_sub(8), row), *color, label)?;
    }

    let table_row = cy.saturating_sub(1);
    put(out, (cx.saturating_sub(12), table_row), Color::White, "High scores:")?;
    if ledger.is_empty() {
        put(out, (cx.saturating_sub(12), table_row + 1), Color::DarkGrey, "  (none yet)")?;
    }
    for (i, entry) in ledger.entries().iter().take(5).enumerate() {
        let marker = if entry.victory { "★" } else { " " };
        let line = format!(
            "{:>2}. {:<8} {:>6}  stage {} {marker}",
            i + 1,
            entry.name,
            entry.score,
            entry.phases_completed
        );
        put(out, (cx.saturating_sub(12), table_row + 1 + i as u16), C_HUD_SCORE, &line)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
