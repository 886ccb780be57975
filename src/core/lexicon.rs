// src/core/lexicon.rs
//! Built-in German -> Austrian tables.
//!
//! Phrase order matters: earlier entries are applied first and win on
//! overlapping spans. No target may contain a word key or another phrase's
//! source, otherwise a second pass would keep changing the text.

pub const PHRASES: &[(&str, &str)] = &[
    ("das ist mir egal", "des is ma wurscht"),
    ("ist mir egal", "is ma wurscht"),
    ("es ist egal", "is wurscht"),
    ("ganz egal", "wurscht"),
    ("wie geht es dir", "wie geht's dir"),
    ("grüß gott", "griaß god"),
    ("guten tag", "griaß di"),
    ("guten morgen", "guat'n moagn"),
    ("auf wiedersehen", "pfiat di"),
    ("bis später", "bis spada"),
    ("bis bald", "servas"),
    ("ich weiß nicht", "i waß net"),
    ("keine ahnung", "ka ahnung"),
    ("keine sorge", "ka sorg"),
    ("was ist los", "wos is los"),
    ("ein bisschen", "a bissl"),
    ("viel spaß", "vü spaß"),
    ("schlecht gelaunt", "grantig"),
    ("alles klar", "eh kloa"),
    ("schönen tag", "an schen tog"),
    ("meine güte", "jessas"),
    ("gehen wir", "gemma"),
    ("lass uns gehen", "gemma"),
];

pub const WORDS: &[(&str, &str)] = &[
    // greetings
    ("hallo", "servus"),
    ("tschüss", "baba"),
    ("tschüs", "baba"),
    // function words
    ("ich", "i"),
    ("ist", "is"),
    ("das", "des"),
    ("nicht", "net"),
    ("nichts", "nix"),
    ("etwas", "wos"),
    ("was", "wos"),
    ("ein", "a"),
    ("eine", "a"),
    ("einen", "an"),
    ("kein", "ka"),
    ("keine", "kane"),
    ("keinen", "kan"),
    ("wir", "mia"),
    ("mir", "ma"),
    ("ja", "jo"),
    ("nein", "na"),
    ("oder", "oda"),
    ("aber", "owa"),
    ("wieder", "wieda"),
    ("immer", "imma"),
    ("unser", "unsa"),
    ("schon", "scho"),
    ("mal", "amoi"),
    ("einmal", "amoi"),
    ("jetzt", "jetzad"),
    ("heute", "heit"),
    ("morgen", "moagn"),
    ("viel", "vü"),
    ("viele", "vüle"),
    ("bisschen", "bissl"),
    ("bißchen", "bissl"),
    // verbs
    ("haben", "hom"),
    ("habe", "hob"),
    ("hab", "hob"),
    ("gehen", "gehn"),
    ("kommen", "kumman"),
    ("komm", "kumm"),
    ("wissen", "wissn"),
    ("weiß", "waß"),
    ("gucken", "schaun"),
    ("schauen", "schaun"),
    ("sprechen", "redn"),
    ("reden", "redn"),
    // adjectives
    ("gut", "guat"),
    ("schön", "schee"),
    ("toll", "leiwand"),
    ("prima", "leiwand"),
    ("kaputt", "hin"),
    ("ärgerlich", "grantig"),
    ("dumm", "deppat"),
    ("schnell", "schnö"),
    // people
    ("junge", "bua"),
    ("mädchen", "madl"),
    ("idiot", "depp"),
    // food
    ("kartoffel", "erdapfel"),
    ("kartoffeln", "erdäpfel"),
    ("tomate", "paradeiser"),
    ("tomaten", "paradeiser"),
    ("sahne", "schlagobers"),
    ("aprikose", "marille"),
    ("aprikosen", "marillen"),
    ("blumenkohl", "karfiol"),
    ("meerrettich", "kren"),
    ("quark", "topfen"),
    ("brötchen", "semmel"),
    ("pfannkuchen", "palatschinken"),
    ("hähnchen", "hendl"),
    // household
    ("tüte", "sackerl"),
    ("plastiktüte", "plastiksackerl"),
    ("treppe", "stiege"),
    ("stuhl", "sessel"),
    ("schrank", "kastn"),
    ("mülleimer", "mistkübel"),
    ("papierkorb", "mistkübel"),
    ("eimer", "kübel"),
    // months
    ("januar", "jänner"),
    ("februar", "feber"),
];
