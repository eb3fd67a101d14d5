//! # Pages
//!
//! HTML views. Fields that are already [`Escaped`](crate::models::Escaped) are written as they are,
//! everything else goes through [`encode_text`] first.
use axum::response::Html;
use html_escape::encode_text;

use crate::{form::FieldError, models::ValidSubmission};

pub const BOT_PAGE: &str = "Salut le bot!";

pub const COUNTRIES: [&str; 6] = ["France", "Belgique", "Suisse", "Canada", "Luxembourg", "Maroc"];

pub const TOPICS: [(&str, &str); 3] = [
    ("Sales", "Ventes"),
    ("Support", "Assistance"),
    ("Partnership", "Partenariat"),
];

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="utf-8">
    <title>Contact</title>
    <style>
        .spam { display: none; }
        .errors { color: #b00020; }
    </style>
</head>
<body>
"#;

const TAIL: &str = "</body>\n</html>\n";

pub fn form_page(errors: &[FieldError]) -> Html<String> {
    let mut page = String::from(HEAD);
    page.push_str("<h1>Contactez-nous</h1>\n");

    if !errors.is_empty() {
        page.push_str("<ul class=\"errors\">\n");
        for error in errors {
            page.push_str(&format!("    <li>{}</li>\n", encode_text(&error.to_string())));
        }
        page.push_str("</ul>\n");
    }

    page.push_str(
        r#"<form action="/submit" method="post">
    <label>Prénom <input type="text" name="prenom"></label>
    <label>Nom <input type="text" name="nom"></label>
    <label>Email <input type="email" name="email"></label>
    <fieldset>
        <legend>Genre</legend>
        <label><input type="radio" name="genre" value="H"> Homme</label>
        <label><input type="radio" name="genre" value="F"> Femme</label>
    </fieldset>
    <label>Pays
        <select name="pays">
            <option value="">-- Choisir --</option>
"#,
    );

    for country in COUNTRIES {
        page.push_str(&format!(
            "            <option value=\"{country}\">{country}</option>\n"
        ));
    }

    page.push_str(
        r#"        </select>
    </label>
    <fieldset>
        <legend>Sujets</legend>
"#,
    );

    for (value, label) in TOPICS {
        page.push_str(&format!(
            "        <label><input type=\"checkbox\" name=\"sujets\" value=\"{value}\"> {label}</label>\n"
        ));
    }

    page.push_str(
        r#"    </fieldset>
    <label>Message <textarea name="message"></textarea></label>
    <input class="spam" type="text" name="spam" tabindex="-1" autocomplete="off">
    <button type="submit">Envoyer</button>
</form>
"#,
    );
    page.push_str(TAIL);

    Html(page)
}

pub fn thank_you_page(submission: &ValidSubmission) -> Html<String> {
    let identity = &submission.identity;
    let topics = submission
        .topics
        .iter()
        .map(|topic| format!("<li>{}</li>", encode_text(topic)))
        .collect::<Vec<_>>()
        .join("");

    let mut page = String::from(HEAD);
    page.push_str(&format!(
        r#"<h1>Merci {given_name} {family_name} !</h1>
<dl>
    <dt>Email</dt><dd>{email}</dd>
    <dt>Pays</dt><dd>{country}</dd>
    <dt>Genre</dt><dd>{gender}</dd>
    <dt>Sujets</dt><dd><ul>{topics}</ul></dd>
    <dt>Message</dt><dd>{message}</dd>
</dl>
<a href="/">Retour</a>
"#,
        given_name = identity.given_name,
        family_name = identity.family_name,
        email = identity.email,
        country = identity.country,
        gender = identity.gender.code(),
        message = submission.message,
    ));
    page.push_str(TAIL);

    Html(page)
}

pub fn bot_page() -> Html<&'static str> {
    Html(BOT_PAGE)
}
