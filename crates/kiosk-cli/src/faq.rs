use colored::Colorize;

/// Admissions-desk FAQ content.
const FAQS: [(&str, &str); 2] = [
    (
        "Is Hostels available in KEC?",
        "Yes, Hostels are available in KEC. 3 hostels for girls and 7 hostels for boys.",
    ),
    (
        "How many Engineering courses are offered?",
        "14 Engineering Degrees",
    ),
];

const CONTACTS: [(&str, &str); 3] = [
    ("Email", "mailto:sabariramrp@gmail.com"),
    ("Phone", "tel:+919489462870"),
    ("Website", "https://kongu.ac.in/index.php"),
];

pub fn print_faqs() {
    println!("{}", "FAQs".cyan().bold());
    for (question, answer) in FAQS {
        println!("{}", format!("Q: {question}").bold());
        println!("A: {answer}");
        println!();
    }

    println!("{}", "Contact".cyan().bold());
    for (label, target) in CONTACTS {
        println!("{label}: {target}");
    }
}
