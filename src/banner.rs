/***************************************/
/*          Console banners            */
/***************************************/
const TITLE: &str = r"
 +-----------------------------------+
 |   E L E V A T O R   S I M U L A   |
 |              T I O N              |
 +-----------------------------------+
";

const SCORECARD: &str = r"
 +-----------------------------------+
 |         S C O R E C A R D         |
 +-----------------------------------+
";

pub fn print_title() {
    println!("{}", TITLE);
}

pub fn print_scorecard(elevator_id: u32, stats: &str) {
    println!("{}", SCORECARD);
    println!("Elevator {}:", elevator_id);
    println!("{}", stats);
}
