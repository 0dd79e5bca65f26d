//! HTML message templates for the bot

use super::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use diet_tracker_shared::types::DailySummary;
use diet_tracker_shared::{MealType, UserProfile};

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keyboard attached to most replies
pub fn main_keyboard(web_app_url: Option<&str>) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![
        InlineKeyboardButton::callback("📊 Today", "today"),
        InlineKeyboardButton::callback("👤 Profile", "profile"),
        InlineKeyboardButton::callback("❓ Help", "help"),
    ]];
    if let Some(url) = web_app_url {
        rows.push(vec![InlineKeyboardButton::web_app("🍽 Open diary", url)]);
    }
    InlineKeyboardMarkup::rows(rows)
}

// ============================================================================
// Command replies
// ============================================================================

pub fn welcome(first_name: &str) -> String {
    format!(
        "👋 Hi, <b>{}</b>!\n\n\
         I help you keep track of meals, steps and sleep, and work out how many \
         calories you need each day.\n\n\
         Open the diary to set up your profile, then use /today to see how your day is going.",
        escape_html(first_name)
    )
}

pub fn help() -> String {
    "<b>Commands</b>\n\
     /start - welcome message\n\
     /today - today's meals, steps and sleep\n\
     /profile - your profile and calorie target\n\
     /help - this message"
        .to_string()
}

pub fn unknown_command() -> String {
    "🤔 I don't know that command. Try /help.".to_string()
}

pub fn missing_profile() -> String {
    "You don't have a profile yet. Open the diary to enter your age, height and weight \
     so I can calculate your daily calorie target."
        .to_string()
}

pub fn profile_card(profile: &UserProfile) -> String {
    let mut card = format!(
        "👤 <b>{}</b>\n\n\
         Age: {}\n\
         Height: {:.0} cm\n\
         Weight: {:.1} kg\n\
         Activity: {}\n\
         Goal: {}\n",
        escape_html(profile.display_name()),
        profile.age,
        profile.height_cm,
        profile.weight_kg,
        profile.activity_level.description(),
        profile.goal.description(),
    );
    if let Some(target) = profile.target_weight_kg {
        card.push_str(&format!("Target weight: {:.1} kg\n", target));
    }
    card.push_str(&format!(
        "\n🔥 BMR: <b>{} kcal</b>\n🎯 Daily target: <b>{} kcal</b>",
        profile.bmr, profile.daily_calories
    ));
    card
}

pub fn daily_summary(summary: &DailySummary) -> String {
    let mut text = format!(
        "📊 <b>Summary for {}</b>\n\n🍽 Meals: {}\n🔥 Calories: {:.0}",
        summary.date.format("%d.%m.%Y"),
        summary.meals_count,
        summary.consumed.calories,
    );
    if let Some(target) = summary.calorie_target {
        text.push_str(&format!(" / {} kcal", target));
    } else {
        text.push_str(" kcal");
    }
    if let Some(remaining) = summary.calories_remaining {
        if remaining >= 0.0 {
            text.push_str(&format!("\n   {:.0} kcal left", remaining));
        } else {
            text.push_str(&format!("\n   {:.0} kcal over target", -remaining));
        }
    }
    text.push_str(&format!(
        "\n🥩 P {:.0} g · C {:.0} g · F {:.0} g\n\
         👟 Steps: {} / {} ({:.0}%)\n\
         😴 Sleep: {}",
        summary.consumed.protein_g,
        summary.consumed.carbs_g,
        summary.consumed.fat_g,
        summary.steps,
        summary.step_goal,
        summary.step_goal_percent,
        format_minutes(summary.sleep_minutes),
    ));
    text
}

// ============================================================================
// Notifications
// ============================================================================

pub fn meal_reminder(meal_type: Option<MealType>) -> String {
    match meal_type {
        Some(meal) => format!(
            "⏰ Time for {}! Don't forget to log it in your diary.",
            meal.label().to_lowercase()
        ),
        None => "⏰ Don't forget to log your meal in your diary.".to_string(),
    }
}

pub fn sleep_reminder() -> String {
    "🌙 It's getting late. Time to wind down, and remember to log your sleep.".to_string()
}

pub fn step_goal_reached(steps: i64, goal: i64) -> String {
    format!(
        "🎉 Step goal reached! <b>{}</b> steps today (goal {}). Great work!",
        steps, goal
    )
}

fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return "no data".to_string();
    }
    format!("{} h {:02} min", minutes / 60, minutes % 60)
}
