use dioxus::prelude::*;
use dioxus_primitives::avatar as prim;

#[component]
pub fn Avatar(mut props: prim::AvatarProps) -> Element {
    props
        .attributes
        .push(Attribute::new("class", "avatar", None, false));

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        prim::Avatar { ..props }
    }
}

#[component]
pub fn AvatarFallback(mut props: prim::AvatarFallbackProps) -> Element {
    props
        .attributes
        .push(Attribute::new("class", "avatar-fallback", None, false));

    rsx! {
        prim::AvatarFallback { ..props }
    }
}

/// Up to two initials from a display name: "Riley Nguyen" -> "RN".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Initials avatar for a person. Staff records carry no photo.
#[component]
pub fn UserAvatar(name: String) -> Element {
    let text = initials(&name);
    rsx! {
        Avatar {
            AvatarFallback { "{text}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("Riley Nguyen"), "RN");
        assert_eq!(initials("avery de la cruz"), "AD");
        assert_eq!(initials("Sam"), "S");
        assert_eq!(initials("   "), "");
    }
}
