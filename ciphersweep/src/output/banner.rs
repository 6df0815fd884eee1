use console::style;

pub fn print_banner() {
  let banner = include_str!("../../templates/banner.txt");
  for line in banner.lines() {
    println!("{}", style(line).green().bold());
  }
  println!("  {}", style("TLS cipher strength scanner (nmap ssl-enum-ciphers)").dim());
  println!();
}
