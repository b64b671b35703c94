/// One of the News Nest anchor birds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Persona {
    /// Backend id of the persona (e.g. `polly`).
    pub id: &'static str,
    /// Display name shown in the conversation.
    pub name: &'static str,
    /// Short description of the persona's beat.
    pub beat: &'static str,
    /// Opening line of a fresh conversation.
    pub welcome: &'static str,
}

/// All personas, in the order the app presents them. Polly is the
/// default host and routes off-beat questions to the others.
pub const PERSONAS: &[Persona] = &[
    Persona {
        id: "polly",
        name: "Polly the Parrot",
        beat: "Main host",
        welcome: "Welcome to News Nest! 👋 I'm Polly, your friendly news \
                  anchor. Ask me anything about today's news!",
    },
    Persona {
        id: "flynn",
        name: "Flynn the Falcon",
        beat: "Sports",
        welcome: "Flynn here, fresh from the press box! ⚽ What game do you \
                  want the scoop on?",
    },
    Persona {
        id: "pixel",
        name: "Pixel the Pigeon",
        beat: "Tech",
        welcome: "Hey, Pixel here! 💡 Curious about a gadget, an app, or \
                  how something works? Ask away.",
    },
    Persona {
        id: "cato",
        name: "Cato the Crane",
        beat: "Civics",
        welcome: "Greetings, I'm Cato. 🏛️ Ask me about laws, elections, or \
                  how decisions get made.",
    },
];

impl Persona {
    /// Looks a persona up by its backend id.
    pub fn find(id: &str) -> Option<&'static Persona> {
        PERSONAS.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_id() {
        let flynn = Persona::find("flynn").unwrap();
        assert_eq!(flynn.name, "Flynn the Falcon");
        assert!(Persona::find("robin").is_none());
    }

    #[test]
    fn test_polly_is_the_default_host() {
        assert_eq!(PERSONAS[0].id, "polly");
    }
}
