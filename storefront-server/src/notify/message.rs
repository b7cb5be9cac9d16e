//! Chat message formatting (Telegram HTML subset)

use chrono::{DateTime, Utc};
use shared::models::{OrderRequest, Product};

const UNKNOWN: &str = "Неизвестно";

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

/// Total after a percentage discount, rounded to whole currency units
pub fn discounted_total(total: u64, percent: f64) -> u64 {
    let percent = percent.clamp(0.0, 100.0);
    (total as f64 * (100.0 - percent) / 100.0).round() as u64
}

pub fn format_order_message(
    order: &OrderRequest,
    promo: Option<(&str, f64)>,
    placed_at: DateTime<Utc>,
) -> String {
    let mut lines = vec![
        "🛍️ <b>НОВЫЙ ЗАКАЗ</b>".to_string(),
        placed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        String::new(),
        "<b>Товары:</b>".to_string(),
    ];

    for (i, item) in order.products.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, escape_html(&item.name)));
        lines.push(format!("   • Размер: {}", escape_html(&item.size)));
        lines.push(format!("   • Цвет: {}", escape_html(&item.color)));
        if item.quantity > 1 {
            lines.push(format!("   • Количество: {}", item.quantity));
        }
        lines.push(format!("   • Цена: {}₽", item.price));
        lines.push(String::new());
    }

    lines.push(format!("💰 <b>Итого: {}₽</b>", order.total_price));
    if let Some((code, discount)) = promo {
        lines.push(format!(
            "🏷️ Промокод: <code>{}</code> (−{}%)",
            escape_html(code),
            discount
        ));
        lines.push(format!(
            "💳 <b>К оплате: {}₽</b>",
            discounted_total(order.total_price, discount)
        ));
    }

    let user = &order.user;
    lines.push(String::new());
    lines.push("<b>Информация о покупателе:</b>".to_string());
    lines.push(format!(
        "👤 ID: {}",
        user.id.map(|id| id.to_string()).unwrap_or_else(|| UNKNOWN.to_string())
    ));
    lines.push(format!(
        "📛 Имя: {}",
        escape_html(user.first_name.as_deref().unwrap_or(UNKNOWN))
    ));
    lines.push(format!(
        "📞 Username: {}",
        user.username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(|u| format!("@{}", escape_html(u)))
            .unwrap_or_else(|| "Не указан".to_string())
    ));

    lines.join("\n")
}

/// `https://t.me/<bot>?start=store_<id>`
pub fn share_link(bot_username: &str, product_id: u64) -> String {
    format!(
        "https://t.me/{}?start=store_{}",
        bot_username.trim_start_matches('@'),
        product_id
    )
}

pub fn format_share_message(product: &Product, bot_username: &str) -> String {
    let mut msg = format!("<b>{}</b>\n💰 {}₽\n", escape_html(&product.name), product.price);
    if !product.description.is_empty() {
        msg.push_str(&format!("\n{}\n", escape_html(&product.description)));
    }
    msg.push_str(&format!(
        "\n<a href=\"{}\">Открыть в магазине</a>",
        share_link(bot_username, product.id)
    ));
    msg
}
