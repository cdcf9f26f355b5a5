//! Example of the text codec and the key/value seeker

use serde_json::json;
use xknife::text::to_utf16;
use xknife::{decoder, encoder, seeker, EscapeOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== Base64 ===\n");

    let text = "Ciao, mondo! 😀";
    let encoded = encoder::encode(&to_utf16(text)).expect("well-formed text");
    println!("{} -> {}", text, encoded);

    let decoded = decoder::decode(&to_utf16(&encoded))?;
    assert_eq!(decoded.as_deref(), Some(text));

    // A lone surrogate is rejected with a warning instead of an error
    assert_eq!(encoder::encode(&[0xD800]), None);

    let payload: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
    println!("payload -> {}", encoder::blob_to_base64(payload).await?);

    println!("\n=== Unicode escapes ===\n");

    let units = to_utf16(text);
    let basic = encoder::to_unicode_escape(&units);
    let aware = encoder::to_unicode_escape_with(&units, &EscapeOptions::surrogate_aware());
    println!("basic:           {}", basic);
    println!("surrogate-aware: {}", aware);
    assert_eq!(decoder::from_unicode_escape(&basic), units);

    println!("\n=== Seeker ===\n");

    let data = json!({
        "a": 1,
        "b": { "a": 2, "c": 3 },
        "c": [{ "a": 4 }, { "a": 5, "d": 6 }],
        "d": { "e": { "a": 7, "c": 8 } }
    });
    for (key, values) in seeker::extract(&data, &["a", "c"]) {
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        println!("{}: [{}]", key, rendered.join(", "));
    }

    Ok(())
}
