fn main() {
    pickview::show();
}
